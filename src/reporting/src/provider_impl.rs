use std::str::FromStr;

use arrow::array::Array;
use arrow::array::Date32Array;
use arrow::array::Float64Array;
use arrow::array::Int64Array;
use arrow::array::StringArray;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::Duration;
use chrono::NaiveDate;
use common::types::Region;
use datafusion::prelude::ParquetReadOptions;
use datafusion::prelude::SessionConfig;
use datafusion::prelude::SessionContext;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::config::ReportingConfig;
use crate::error::ReportingError;
use crate::error::Result;
use crate::provider::FilterChoices;
use crate::provider::FilterState;
use crate::provider::Heatmap;
use crate::provider::ProductProfitability;
use crate::provider::ProductRow;
use crate::provider::ProductSales;
use crate::provider::RegionMetrics;
use crate::provider::RegionSales;
use crate::provider::RegionalRow;
use crate::provider::SalesProvider;
use crate::provider::Summary;
use crate::provider::TimelinePoint;

fn sql_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn sql_str_list(values: &[String]) -> String {
    values.iter().map(|v| sql_str(v)).collect::<Vec<_>>().join(", ")
}

/// Builds the WHERE clause for the current filter state. Empty
/// selections leave the dimension unconstrained.
fn where_clause(filters: &FilterState) -> String {
    let mut preds = Vec::new();

    if let Some(regions) = &filters.regions {
        if !regions.is_empty() {
            preds.push(format!("region IN ({})", sql_str_list(regions)));
        }
    }
    if let Some(products) = &filters.products {
        if !products.is_empty() {
            preds.push(format!("product IN ({})", sql_str_list(products)));
        }
    }
    if let Some((from, to)) = &filters.date_range {
        preds.push(format!("date >= DATE '{from}' AND date <= DATE '{to}'"));
    }

    if preds.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", preds.join(" AND "))
    }
}

fn str_val(batch: &RecordBatch, col: usize, row: usize) -> Result<String> {
    let arr = batch
        .column(col)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ReportingError::Internal(format!("column {col} is not utf8")))?;
    Ok(arr.value(row).to_string())
}

fn f64_val(batch: &RecordBatch, col: usize, row: usize) -> Result<f64> {
    let arr = batch
        .column(col)
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| ReportingError::Internal(format!("column {col} is not f64")))?;
    Ok(if arr.is_null(row) { 0.0 } else { arr.value(row) })
}

fn i64_val(batch: &RecordBatch, col: usize, row: usize) -> Result<i64> {
    let arr = batch
        .column(col)
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| ReportingError::Internal(format!("column {col} is not i64")))?;
    Ok(if arr.is_null(row) { 0 } else { arr.value(row) })
}

fn date_val(batch: &RecordBatch, col: usize, row: usize) -> Result<Option<NaiveDate>> {
    let arr = batch
        .column(col)
        .as_any()
        .downcast_ref::<Date32Array>()
        .ok_or_else(|| ReportingError::Internal(format!("column {col} is not date32")))?;
    if arr.is_null(row) {
        return Ok(None);
    }
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| ReportingError::Internal("epoch".to_string()))?;
    Ok(Some(epoch + Duration::days(arr.value(row) as i64)))
}

/// DataFusion-backed provider over a registered parquet table.
pub struct DfProvider {
    ctx: SessionContext,
    table: String,
}

impl DfProvider {
    pub async fn try_new(cfg: &ReportingConfig) -> Result<Self> {
        if !cfg.warehouse_path.exists() {
            return Err(ReportingError::NoConnection(format!(
                "warehouse file {} does not exist",
                cfg.warehouse_path.display()
            )));
        }

        let session_cfg = SessionConfig::new()
            .with_default_catalog_and_schema(cfg.catalog.as_str(), cfg.schema.as_str());
        let ctx = SessionContext::new_with_config(session_cfg);
        ctx.register_parquet(
            &cfg.table,
            cfg.warehouse_path.to_string_lossy().as_ref(),
            ParquetReadOptions::default(),
        )
        .await?;

        Ok(Self {
            ctx,
            table: cfg.table.clone(),
        })
    }

    fn table(&self) -> String {
        format!("\"{}\"", self.table)
    }

    async fn collect(&self, sql: &str) -> Result<Vec<RecordBatch>> {
        debug!("query: {sql}");
        Ok(self.ctx.sql(sql).await?.collect().await?)
    }
}

#[async_trait]
impl SalesProvider for DfProvider {
    async fn filter_choices(&self) -> Result<FilterChoices> {
        let regions = {
            let sql = format!(
                "SELECT DISTINCT region FROM {} ORDER BY region",
                self.table()
            );
            let mut out = Vec::new();
            for batch in self.collect(&sql).await? {
                for row in 0..batch.num_rows() {
                    out.push(str_val(&batch, 0, row)?);
                }
            }
            out
        };

        let products = {
            let sql = format!(
                "SELECT product, CAST(SUM(total_amount) AS DOUBLE) AS total_sales \
                 FROM {} GROUP BY product ORDER BY total_sales DESC LIMIT 20",
                self.table()
            );
            let mut out = Vec::new();
            for batch in self.collect(&sql).await? {
                for row in 0..batch.num_rows() {
                    out.push(str_val(&batch, 0, row)?);
                }
            }
            out
        };

        let date_range = {
            let sql = format!(
                "SELECT MIN(date) AS min_date, MAX(date) AS max_date FROM {}",
                self.table()
            );
            let batches = self.collect(&sql).await?;
            match batches.first() {
                Some(batch) if batch.num_rows() > 0 => {
                    match (date_val(batch, 0, 0)?, date_val(batch, 1, 0)?) {
                        (Some(min), Some(max)) => Some((min, max)),
                        _ => None,
                    }
                }
                _ => None,
            }
        };

        Ok(FilterChoices {
            regions,
            products,
            date_range,
        })
    }

    async fn summary(&self, filters: &FilterState) -> Result<Summary> {
        let sql = format!(
            "SELECT COALESCE(CAST(SUM(total_amount) AS DOUBLE), 0.0) AS total_sales, \
             COUNT(*) AS total_transactions, \
             COALESCE(CAST(AVG(total_amount) AS DOUBLE), 0.0) AS avg_transaction, \
             COUNT(DISTINCT customer_id) AS unique_customers \
             FROM {}{}",
            self.table(),
            where_clause(filters)
        );

        let batches = self.collect(&sql).await?;
        let batch = match batches.first() {
            Some(b) if b.num_rows() > 0 => b,
            _ => return Ok(Summary::default()),
        };

        Ok(Summary {
            total_sales: f64_val(batch, 0, 0)?,
            total_transactions: i64_val(batch, 1, 0)?,
            avg_transaction: f64_val(batch, 2, 0)?,
            unique_customers: i64_val(batch, 3, 0)?,
        })
    }

    async fn regional_sales(&self, filters: &FilterState) -> Result<Vec<RegionSales>> {
        let sql = format!(
            "SELECT region, CAST(SUM(total_amount) AS DOUBLE) AS total_sales, \
             COUNT(*) AS transactions \
             FROM {}{} GROUP BY region ORDER BY total_sales ASC",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                out.push(RegionSales {
                    region: str_val(&batch, 0, row)?,
                    total_sales: f64_val(&batch, 1, row)?,
                    transactions: i64_val(&batch, 2, row)?,
                });
            }
        }
        Ok(out)
    }

    async fn regional_metrics(&self, filters: &FilterState) -> Result<Vec<RegionMetrics>> {
        let sql = format!(
            "SELECT region, CAST(SUM(total_amount) AS DOUBLE) AS total_sales, \
             CAST(AVG(total_amount) AS DOUBLE) AS avg_transaction, \
             COUNT(DISTINCT customer_id) AS unique_customers, \
             SUM(quantity) AS total_quantity \
             FROM {}{} GROUP BY region ORDER BY region",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                let total_sales = f64_val(&batch, 1, row)?;
                let unique_customers = i64_val(&batch, 3, row)?;
                let sales_per_customer = if unique_customers > 0 {
                    total_sales / unique_customers as f64
                } else {
                    0.0
                };
                out.push(RegionMetrics {
                    region: str_val(&batch, 0, row)?,
                    total_sales,
                    avg_transaction: f64_val(&batch, 2, row)?,
                    unique_customers,
                    total_quantity: i64_val(&batch, 4, row)?,
                    sales_per_customer,
                });
            }
        }
        Ok(out)
    }

    async fn sales_timeline(&self, filters: &FilterState) -> Result<Vec<TimelinePoint>> {
        let sql = format!(
            "SELECT CAST(date_trunc('month', CAST(date AS TIMESTAMP)) AS DATE) AS month, \
             region, CAST(SUM(total_amount) AS DOUBLE) AS total_sales \
             FROM {}{} \
             GROUP BY date_trunc('month', CAST(date AS TIMESTAMP)), region \
             ORDER BY month, region",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                let month = match date_val(&batch, 0, row)? {
                    Some(d) => d,
                    None => continue,
                };
                out.push(TimelinePoint {
                    month,
                    region: str_val(&batch, 1, row)?,
                    total_sales: f64_val(&batch, 2, row)?,
                });
            }
        }
        Ok(out)
    }

    async fn top_products(&self, filters: &FilterState) -> Result<Vec<ProductSales>> {
        let sql = format!(
            "SELECT product, CAST(SUM(total_amount) AS DOUBLE) AS total_sales \
             FROM {}{} GROUP BY product ORDER BY total_sales DESC LIMIT 10",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                out.push(ProductSales {
                    product: str_val(&batch, 0, row)?,
                    total_sales: f64_val(&batch, 1, row)?,
                });
            }
        }
        Ok(out)
    }

    async fn product_profitability(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<ProductProfitability>> {
        let sql = format!(
            "SELECT product, CAST(SUM(total_amount) AS DOUBLE) AS total_sales, \
             SUM(quantity) AS total_quantity, \
             CAST(AVG(unit_price) AS DOUBLE) AS avg_unit_price, \
             CAST(AVG(discount_percent) AS DOUBLE) AS avg_discount \
             FROM {}{} GROUP BY product",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                let total_sales = f64_val(&batch, 1, row)?;
                let total_quantity = i64_val(&batch, 2, row)?;
                let revenue_per_unit = if total_quantity > 0 {
                    total_sales / total_quantity as f64
                } else {
                    0.0
                };
                out.push(ProductProfitability {
                    product: str_val(&batch, 0, row)?,
                    total_sales,
                    total_quantity,
                    avg_unit_price: f64_val(&batch, 3, row)?,
                    avg_discount: f64_val(&batch, 4, row)?,
                    revenue_per_unit,
                });
            }
        }

        // top 15 by revenue per unit
        out.sort_by(|a, b| {
            b.revenue_per_unit
                .partial_cmp(&a.revenue_per_unit)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        out.truncate(15);
        Ok(out)
    }

    async fn product_region_matrix(&self, filters: &FilterState) -> Result<Heatmap> {
        let sql = format!(
            "SELECT product, region, CAST(SUM(total_amount) AS DOUBLE) AS total_sales \
             FROM {}{} GROUP BY product, region",
            self.table(),
            where_clause(filters)
        );

        let mut cells: Vec<(String, String, f64)> = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                cells.push((
                    str_val(&batch, 0, row)?,
                    str_val(&batch, 1, row)?,
                    f64_val(&batch, 2, row)?,
                ));
            }
        }
        if cells.is_empty() {
            return Ok(Heatmap::default());
        }

        // top 15 products by overall sales
        let mut totals: Vec<(String, f64)> = Vec::new();
        for (product, _, v) in &cells {
            match totals.iter_mut().find(|(p, _)| p == product) {
                Some((_, sum)) => *sum += v,
                None => totals.push((product.clone(), *v)),
            }
        }
        totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        totals.truncate(15);
        let products: Vec<String> = totals.into_iter().map(|(p, _)| p).collect();

        // regions in canonical enum order, anything unknown appended
        let mut regions: Vec<String> = Region::iter()
            .map(|r| r.to_string())
            .filter(|r| cells.iter().any(|(_, cr, _)| cr == r))
            .collect();
        let mut extra: Vec<String> = cells
            .iter()
            .map(|(_, r, _)| r.clone())
            .filter(|r| Region::from_str(r).is_err() && !regions.contains(r))
            .collect();
        extra.sort();
        extra.dedup();
        regions.append(&mut extra);

        let values = products
            .iter()
            .map(|p| {
                regions
                    .iter()
                    .map(|r| {
                        cells
                            .iter()
                            .find(|(cp, cr, _)| cp == p && cr == r)
                            .map(|(_, _, v)| *v)
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        Ok(Heatmap {
            products,
            regions,
            values,
        })
    }

    async fn regional_table(&self, filters: &FilterState) -> Result<Vec<RegionalRow>> {
        let sql = format!(
            "SELECT region, CAST(SUM(total_amount) AS DOUBLE) AS total_sales, \
             CAST(AVG(total_amount) AS DOUBLE) AS avg_transaction, \
             SUM(quantity) AS total_quantity, \
             COUNT(*) AS total_transactions, \
             COUNT(DISTINCT customer_id) AS unique_customers, \
             CAST(AVG(discount_percent) AS DOUBLE) AS avg_discount \
             FROM {}{} GROUP BY region ORDER BY region",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                out.push(RegionalRow {
                    region: str_val(&batch, 0, row)?,
                    total_sales: f64_val(&batch, 1, row)?,
                    avg_transaction: f64_val(&batch, 2, row)?,
                    total_quantity: i64_val(&batch, 3, row)?,
                    total_transactions: i64_val(&batch, 4, row)?,
                    unique_customers: i64_val(&batch, 5, row)?,
                    avg_discount: f64_val(&batch, 6, row)?,
                });
            }
        }
        Ok(out)
    }

    async fn product_table(&self, filters: &FilterState) -> Result<Vec<ProductRow>> {
        let sql = format!(
            "SELECT product, CAST(SUM(total_amount) AS DOUBLE) AS total_sales, \
             SUM(quantity) AS total_quantity, \
             CAST(AVG(unit_price) AS DOUBLE) AS avg_unit_price, \
             CAST(AVG(discount_percent) AS DOUBLE) AS avg_discount, \
             COUNT(*) AS total_transactions \
             FROM {}{} GROUP BY product ORDER BY total_sales DESC LIMIT 20",
            self.table(),
            where_clause(filters)
        );

        let mut out = Vec::new();
        for batch in self.collect(&sql).await? {
            for row in 0..batch.num_rows() {
                out.push(ProductRow {
                    product: str_val(&batch, 0, row)?,
                    total_sales: f64_val(&batch, 1, row)?,
                    total_quantity: i64_val(&batch, 2, row)?,
                    avg_unit_price: f64_val(&batch, 3, row)?,
                    avg_discount: f64_val(&batch, 4, row)?,
                    total_transactions: i64_val(&batch, 5, row)?,
                });
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_building() {
        let empty = FilterState::default();
        assert_eq!(where_clause(&empty), "");

        let filters = FilterState {
            regions: Some(vec!["North".to_string(), "West".to_string()]),
            products: Some(vec![]),
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )),
        };
        let clause = where_clause(&filters);
        assert!(clause.starts_with(" WHERE "));
        assert!(clause.contains("region IN ('North', 'West')"));
        // empty product selection leaves products unconstrained
        assert!(!clause.contains("product IN"));
        assert!(clause.contains("date >= DATE '2024-01-01'"));
        assert!(clause.contains("date <= DATE '2024-12-31'"));
    }

    #[test]
    fn sql_strings_escaped() {
        assert_eq!(sql_str("O'Brien"), "'O''Brien'");
    }
}
