pub mod config;
pub mod error;
pub mod logging;

pub use config::ReportConfig;
pub use error::{ErrorBody, ErrorCategory, ReportError};
