use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a report request can fail. All of them are terminal for the
/// request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("No selected file")]
    NoSelectedFile,

    #[error("File type not allowed. Please upload a CSV or Excel file.")]
    DisallowedExtension,

    #[error("File is too large. Max size is {max_mb}MB.")]
    FileTooLarge { max_mb: u64 },

    #[error("Failed to parse CSV file: {0}")]
    CsvParse(String),

    #[error("Failed to parse Excel file: {0}")]
    ExcelParse(String),

    #[error("Invalid output format selected")]
    InvalidOutputFormat,

    #[error("Failed to generate report")]
    EmptyReport,

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// Broad failure classes of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Rejected before any processing (missing file, extension, size, bad selector).
    InputRejection,
    /// The uploaded content could not be parsed.
    ParseFailure,
    /// Summarization or output generation failed.
    RenderFailure,
}

/// Structured error returned to callers, serializable as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoSelectedFile
            | Self::DisallowedExtension
            | Self::FileTooLarge { .. }
            | Self::InvalidOutputFormat => ErrorCategory::InputRejection,
            Self::CsvParse(_) | Self::ExcelParse(_) => ErrorCategory::ParseFailure,
            Self::EmptyReport | Self::Unexpected(_) => ErrorCategory::RenderFailure,
        }
    }

    /// HTTP-style status: 400 for bad input, 500 for everything else.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::InputRejection | ErrorCategory::ParseFailure => 400,
            ErrorCategory::RenderFailure => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            status: self.status_code(),
        }
    }
}

impl ErrorBody {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"error":"{}","status":{}}}"#, self.error, self.status)
        })
    }
}
