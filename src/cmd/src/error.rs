use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("sales-gen: {0:?}")]
    SalesGen(#[from] sales_gen::error::SalesGenError),
    #[error("reporting: {0:?}")]
    Reporting(#[from] reporting::error::ReportingError),
}
