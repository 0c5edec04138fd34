use std::result;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = result::Result<T, SalesGenError>;

#[derive(Error, Debug)]
pub enum SalesGenError {
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("arrow: {0:?}")]
    Arrow(#[from] ArrowError),
    #[error("parquet: {0:?}")]
    Parquet(#[from] ParquetError),
    #[error("io: {0:?}")]
    Io(#[from] std::io::Error),
}
