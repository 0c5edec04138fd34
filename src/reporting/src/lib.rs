pub mod config;
pub mod dashboard;
pub mod error;
pub mod provider;
pub mod provider_impl;

pub use config::ReportingConfig;
pub use dashboard::Dashboard;
pub use error::Result;
pub use provider::FilterState;
pub use provider::SalesProvider;
pub use provider_impl::DfProvider;
