use std::env;
use std::path::PathBuf;

/// Warehouse connection settings. Every field is overridable through an
/// environment variable:
///
/// - `WAREHOUSE_PATH` — parquet file to query (default `sales.parquet`)
/// - `WAREHOUSE_CATALOG` — default catalog name (default `datafusion`)
/// - `WAREHOUSE_SCHEMA` — default schema name (default `public`)
/// - `SALES_TABLE` — table the sales data is registered under
///   (default `sales`)
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub warehouse_path: PathBuf,
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            warehouse_path: PathBuf::from("sales.parquet"),
            catalog: "datafusion".to_string(),
            schema: "public".to_string(),
            table: "sales".to_string(),
        }
    }
}

impl ReportingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            warehouse_path: env::var("WAREHOUSE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.warehouse_path),
            catalog: env::var("WAREHOUSE_CATALOG").unwrap_or(defaults.catalog),
            schema: env::var("WAREHOUSE_SCHEMA").unwrap_or(defaults.schema),
            table: env::var("SALES_TABLE").unwrap_or(defaults.table),
        }
    }
}
