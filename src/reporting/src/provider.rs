use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;

/// Current filter selection. `None` (or an empty selection) leaves the
/// dimension unconstrained, mirroring the dashboard's "nothing picked"
/// state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub regions: Option<Vec<String>>,
    pub products: Option<Vec<String>>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Selectable filter values derived from the table itself.
#[derive(Debug, Clone, Default)]
pub struct FilterChoices {
    pub regions: Vec<String>,
    /// Top 20 products by total sales, descending.
    pub products: Vec<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_sales: f64,
    pub total_transactions: i64,
    pub avg_transaction: f64,
    pub unique_customers: i64,
}

fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 { format!("-{out}") } else { out }
}

impl Summary {
    pub fn total_sales_display(&self) -> String {
        format!("${}", group_thousands(self.total_sales.round() as i64))
    }

    pub fn total_transactions_display(&self) -> String {
        group_thousands(self.total_transactions)
    }

    pub fn avg_transaction_display(&self) -> String {
        if self.total_transactions == 0 {
            return "$0".to_string();
        }
        format!("${:.2}", self.avg_transaction)
    }

    pub fn unique_customers_display(&self) -> String {
        group_thousands(self.unique_customers)
    }
}

/// One bar of the "total sales by region" chart.
#[derive(Debug, Clone, Default)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
    pub transactions: i64,
}

/// One point of the "sales per customer vs customer count" scatter.
#[derive(Debug, Clone, Default)]
pub struct RegionMetrics {
    pub region: String,
    pub total_sales: f64,
    pub avg_transaction: f64,
    pub unique_customers: i64,
    pub total_quantity: i64,
    pub sales_per_customer: f64,
}

/// One point of the monthly sales time series, per region.
#[derive(Debug, Clone, Default)]
pub struct TimelinePoint {
    pub month: NaiveDate,
    pub region: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductSales {
    pub product: String,
    pub total_sales: f64,
}

/// One point of the "revenue per unit vs quantity" scatter.
#[derive(Debug, Clone, Default)]
pub struct ProductProfitability {
    pub product: String,
    pub total_sales: f64,
    pub total_quantity: i64,
    pub avg_unit_price: f64,
    pub avg_discount: f64,
    pub revenue_per_unit: f64,
}

/// Product x region sales matrix for the heatmap. `values[i][j]` is the
/// total for `products[i]` in `regions[j]`.
#[derive(Debug, Clone, Default)]
pub struct Heatmap {
    pub products: Vec<String>,
    pub regions: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default)]
pub struct RegionalRow {
    pub region: String,
    pub total_sales: f64,
    pub avg_transaction: f64,
    pub total_quantity: i64,
    pub total_transactions: i64,
    pub unique_customers: i64,
    pub avg_discount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductRow {
    pub product: String,
    pub total_sales: f64,
    pub total_quantity: i64,
    pub avg_unit_price: f64,
    pub avg_discount: f64,
    pub total_transactions: i64,
}

/// Tabular query interface over the sales table. Every method is a pure
/// function of the filter state; an empty filtered set yields empty
/// collections and zeroed metrics, never an error.
#[async_trait]
pub trait SalesProvider: Send + Sync {
    async fn filter_choices(&self) -> Result<FilterChoices>;
    async fn summary(&self, filters: &FilterState) -> Result<Summary>;
    async fn regional_sales(&self, filters: &FilterState) -> Result<Vec<RegionSales>>;
    async fn regional_metrics(&self, filters: &FilterState) -> Result<Vec<RegionMetrics>>;
    async fn sales_timeline(&self, filters: &FilterState) -> Result<Vec<TimelinePoint>>;
    async fn top_products(&self, filters: &FilterState) -> Result<Vec<ProductSales>>;
    async fn product_profitability(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<ProductProfitability>>;
    async fn product_region_matrix(&self, filters: &FilterState) -> Result<Heatmap>;
    async fn regional_table(&self, filters: &FilterState) -> Result<Vec<RegionalRow>>;
    async fn product_table(&self, filters: &FilterState) -> Result<Vec<ProductRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_display_zero_state() {
        let summary = Summary::default();
        assert_eq!(summary.total_sales_display(), "$0");
        assert_eq!(summary.total_transactions_display(), "0");
        // no transactions renders the compact "$0", not "$0.00"
        assert_eq!(summary.avg_transaction_display(), "$0");
        assert_eq!(summary.unique_customers_display(), "0");
    }

    #[test]
    fn summary_display_grouping() {
        let summary = Summary {
            total_sales: 1234567.89,
            total_transactions: 10432,
            avg_transaction: 118.34,
            unique_customers: 499,
        };
        assert_eq!(summary.total_sales_display(), "$1,234,568");
        assert_eq!(summary.total_transactions_display(), "10,432");
        assert_eq!(summary.avg_transaction_display(), "$118.34");
        assert_eq!(summary.unique_customers_display(), "499");
    }
}
