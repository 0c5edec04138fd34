use std::sync::Arc;

use arrow::datatypes::DataType;
use arrow::datatypes::Field;
use arrow::datatypes::Schema;
use arrow::datatypes::SchemaRef;
use common::DECIMAL_PRECISION;
use common::DECIMAL_SCALE;

/// Schema of the output sales table.
pub fn sales_schema() -> SchemaRef {
    let money = DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE);
    Arc::new(Schema::new(vec![
        Field::new("transaction_id", DataType::Utf8, false),
        Field::new("date", DataType::Date32, false),
        Field::new("product", DataType::Utf8, false),
        Field::new("quantity", DataType::Int64, false),
        Field::new("unit_price", money.clone(), false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("customer_name", DataType::Utf8, false),
        Field::new("customer_email", DataType::Utf8, false),
        Field::new("customer_segment", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("sales_channel", DataType::Utf8, false),
        Field::new("salesperson", DataType::Utf8, false),
        Field::new("salesperson_tier", DataType::Utf8, false),
        Field::new("discount_percent", money.clone(), false),
        Field::new("total_amount", money, false),
    ]))
}
