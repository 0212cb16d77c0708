//! Tabular data for report generation: the [`Frame`] model, CSV and XLSX
//! ingestion, column-name normalization and descriptive statistics.

pub mod frame;
pub mod ingest;
pub mod normalize;
pub mod summary;

pub use frame::{CellValue, Column, ColumnKind, Frame};
pub use ingest::{SourceFormat, read_csv, read_frame, read_xlsx};
pub use normalize::{normalize_column_name, normalize_headers};
pub use summary::{ColumnSummary, STATISTICS, Summary, summarize};
