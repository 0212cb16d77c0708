// Report rendering: CSV, XLSX and PDF.

pub mod csv;
pub mod pdf;
pub mod xlsx;

pub use csv::generate_csv;
pub use pdf::{PageSize, RenderedPdf, render_full_data_pdf, render_summary_pdf};
pub use xlsx::{FULL_DATA_SHEET, SUMMARY_SHEET, generate_xlsx};
