use std::result;

use arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use thiserror::Error;

pub type Result<T> = result::Result<T, ReportingError>;

#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("no connection: {0:?}")]
    NoConnection(String),
    #[error("datafusion: {0:?}")]
    DataFusion(#[from] DataFusionError),
    #[error("arrow: {0:?}")]
    Arrow(#[from] ArrowError),
}
