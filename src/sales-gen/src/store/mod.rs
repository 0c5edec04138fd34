mod batch_builder;
pub mod catalog;
pub mod output;
pub mod pools;
pub mod scenario;
pub mod schema;

pub use scenario::Config;
pub use scenario::Scenario;
pub use scenario::Transaction;
