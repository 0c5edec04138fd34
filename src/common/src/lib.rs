pub mod error;
pub mod types;

pub use types::DECIMAL_PRECISION;
pub use types::DECIMAL_SCALE;
pub use types::round2;
