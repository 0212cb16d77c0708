use anyhow::{Context, Result};
use report_frame::Frame;

/// Serialize a frame as CSV: one header row, then every data row.
///
/// Each field is properly quoted/escaped by the `csv` crate. Missing cells
/// are written as empty fields; there is no index column.
pub fn generate_csv(frame: &Frame) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(frame.column_names())
        .context("Failed to write header record")?;

    let mut record = Vec::with_capacity(frame.column_count());
    for row_idx in 0..frame.row_count() {
        record.clear();
        record.extend(frame.row(row_idx).map(ToString::to_string));
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write data record {row_idx}"))?;
    }

    writer.into_inner().context("Failed to flush CSV writer")
}
