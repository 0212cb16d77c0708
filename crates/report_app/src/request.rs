//! Request and response types: the upload, the three selectors and the
//! finished report file.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Characters kept by [`secure_filename`].
static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap());

/// Stem used when the sanitized filename leaves nothing behind.
const FALLBACK_STEM: &str = "report";

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Summary,
    FullData,
}

impl ReportType {
    /// Case-insensitive; `None` for anything but `summary` or `full_data`.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector.to_lowercase().as_str() {
            "summary" => Some(Self::Summary),
            "full_data" => Some(Self::FullData),
            _ => None,
        }
    }

    /// Download filename suffix, without the extension.
    pub fn filename_suffix(self) -> &'static str {
        match self {
            Self::Summary => "_summary_report",
            Self::FullData => "_full_data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Csv,
    Excel,
}

impl OutputFormat {
    /// Case-insensitive; `None` for anything but `pdf`, `csv` or `excel`.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Raw selector values as submitted. They are resolved only after the
/// upload has been parsed, so a bad selector never masks a bad file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSelectors {
    pub report_type: String,
    pub output_format: String,
    pub page_size: String,
}

impl Default for ReportSelectors {
    fn default() -> Self {
        Self {
            report_type: "summary".into(),
            output_format: "pdf".into(),
            page_size: "A4".into(),
        }
    }
}

impl ReportSelectors {
    pub fn new(
        report_type: impl Into<String>,
        output_format: impl Into<String>,
        page_size: impl Into<String>,
    ) -> Self {
        Self {
            report_type: report_type.into(),
            output_format: output_format.into(),
            page_size: page_size.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Upload / ReportFile
// ---------------------------------------------------------------------------

/// An uploaded file as handed over by the host.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Lowercased text after the final `.`, if there is one.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    }
}

/// A generated report ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

// ---------------------------------------------------------------------------
// Filenames
// ---------------------------------------------------------------------------

/// Reduces an uploaded filename to a safe ASCII name.
///
/// Accented letters are folded to their ASCII base (NFKD, then non-ASCII
/// marks dropped). Path separators become spaces, whitespace runs become `_`, characters
/// outside `[A-Za-z0-9_.-]` are dropped and leading or trailing `.`/`_` are
/// stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_FILENAME_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c: char| c == '.' || c == '_')
        .to_string()
}

/// Download name: sanitized stem plus the report suffix and extension.
///
/// Anything that is not a summary gets the full-data suffix.
pub fn download_filename(
    secured: &str,
    report_type: Option<ReportType>,
    format: OutputFormat,
) -> String {
    let stem = match secured.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => secured,
    };
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    let suffix = report_type
        .unwrap_or(ReportType::FullData)
        .filename_suffix();
    format!("{stem}{suffix}.{}", format.extension())
}
