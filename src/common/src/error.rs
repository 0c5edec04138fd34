use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, CommonError>;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("unknown region {0:?}")]
    UnknownRegion(String),
    #[error("unknown segment {0:?}")]
    UnknownSegment(String),
    #[error("unknown tier {0:?}")]
    UnknownTier(String),
    #[error("unknown channel {0:?}")]
    UnknownChannel(String),
}
