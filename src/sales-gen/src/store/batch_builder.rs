use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::array::Date32Builder;
use arrow::array::Decimal128Builder;
use arrow::array::Int64Builder;
use arrow::array::StringBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use common::DECIMAL_PRECISION;
use common::DECIMAL_SCALE;

use crate::error::Result;
use crate::store::scenario::Transaction;

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

fn money_mantissa(v: f64) -> i128 {
    (v * 100.0).round() as i128
}

pub struct RecordBatchBuilder {
    transaction_id: StringBuilder,
    date: Date32Builder,
    product: StringBuilder,
    quantity: Int64Builder,
    unit_price: Decimal128Builder,
    customer_id: StringBuilder,
    customer_name: StringBuilder,
    customer_email: StringBuilder,
    customer_segment: StringBuilder,
    region: StringBuilder,
    sales_channel: StringBuilder,
    salesperson: StringBuilder,
    salesperson_tier: StringBuilder,
    discount_percent: Decimal128Builder,
    total_amount: Decimal128Builder,
    schema: SchemaRef,
    len: usize,
}

impl RecordBatchBuilder {
    pub fn new(cap: usize, schema: SchemaRef) -> Self {
        Self {
            transaction_id: StringBuilder::with_capacity(cap, cap * 36),
            date: Date32Builder::with_capacity(cap),
            product: StringBuilder::with_capacity(cap, cap * 8),
            quantity: Int64Builder::with_capacity(cap),
            unit_price: Decimal128Builder::with_capacity(cap),
            customer_id: StringBuilder::with_capacity(cap, cap * 36),
            customer_name: StringBuilder::with_capacity(cap, cap * 16),
            customer_email: StringBuilder::with_capacity(cap, cap * 24),
            customer_segment: StringBuilder::with_capacity(cap, cap * 8),
            region: StringBuilder::with_capacity(cap, cap * 8),
            sales_channel: StringBuilder::with_capacity(cap, cap * 8),
            salesperson: StringBuilder::with_capacity(cap, cap * 16),
            salesperson_tier: StringBuilder::with_capacity(cap, cap * 16),
            discount_percent: Decimal128Builder::with_capacity(cap),
            total_amount: Decimal128Builder::with_capacity(cap),
            schema,
            len: 0,
        }
    }

    pub fn append(&mut self, tx: &Transaction) {
        self.transaction_id.append_value(tx.id.to_string());
        self.date.append_value(days_since_epoch(tx.date));
        self.product.append_value(tx.product);
        self.quantity.append_value(tx.quantity as i64);
        self.unit_price.append_value(money_mantissa(tx.unit_price));
        self.customer_id.append_value(tx.customer_id.to_string());
        self.customer_name.append_value(&tx.customer_name);
        self.customer_email.append_value(&tx.customer_email);
        self.customer_segment
            .append_value(tx.customer_segment.to_string());
        self.region.append_value(tx.region.to_string());
        self.sales_channel.append_value(tx.sales_channel.to_string());
        self.salesperson.append_value(&tx.salesperson);
        self.salesperson_tier
            .append_value(tx.salesperson_tier.to_string());
        self.discount_percent
            .append_value(money_mantissa(tx.discount_percent));
        self.total_amount
            .append_value(money_mantissa(tx.total_amount));
        self.len += 1;
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.transaction_id.finish()),
            Arc::new(self.date.finish()),
            Arc::new(self.product.finish()),
            Arc::new(self.quantity.finish()),
            Arc::new(
                self.unit_price
                    .finish()
                    .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            ),
            Arc::new(self.customer_id.finish()),
            Arc::new(self.customer_name.finish()),
            Arc::new(self.customer_email.finish()),
            Arc::new(self.customer_segment.finish()),
            Arc::new(self.region.finish()),
            Arc::new(self.sales_channel.finish()),
            Arc::new(self.salesperson.finish()),
            Arc::new(self.salesperson_tier.finish()),
            Arc::new(
                self.discount_percent
                    .finish()
                    .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            ),
            Arc::new(
                self.total_amount
                    .finish()
                    .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            ),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), cols)?;
        self.len = 0;
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
