//! Report generation for uploaded CSV and Excel data.
//!
//! [`ReportPipeline::generate`] validates an [`Upload`], parses it into a
//! frame, optionally summarizes it and renders the result as PDF, CSV or
//! XLSX. Failures come back as [`ReportError`] with a 400 or 500 status.

pub mod pipeline;
pub mod request;

pub use pipeline::ReportPipeline;
pub use report_core::{ErrorBody, ErrorCategory, ReportConfig, ReportError};
pub use request::{
    OutputFormat, ReportFile, ReportSelectors, ReportType, Upload, download_filename,
    secure_filename,
};
