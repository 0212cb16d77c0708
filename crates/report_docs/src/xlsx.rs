use anyhow::{Context, Result};
use report_frame::{CellValue, Frame};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// Sheet name used for summary reports.
pub const SUMMARY_SHEET: &str = "Summary";
/// Sheet name used for full-data reports.
pub const FULL_DATA_SHEET: &str = "Full Data";

/// Generate an XLSX workbook holding `frame` on a single named sheet.
///
/// Returns the raw bytes of the xlsx file (can be written to disk or sent as download).
pub fn generate_xlsx(frame: &Frame, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Failed to set sheet name: {sheet_name}"))?;

    let header_format = Format::new().set_bold();

    // Write header row
    for (col, name) in frame.column_names().into_iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .with_context(|| format!("Failed to write header at column {col}"))?;
    }

    // Write data rows
    for row_idx in 0..frame.row_count() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in frame.row(row_idx).enumerate() {
            write_cell(worksheet, excel_row, col_idx as u16, cell)
                .with_context(|| format!("Failed to write cell at ({excel_row}, {col_idx})"))?;
        }
    }

    // Auto-fit columns for readability
    worksheet.autofit();

    let bytes = workbook
        .save_to_buffer()
        .context("Failed to save workbook to buffer")?;

    Ok(bytes)
}

/// Numbers and booleans keep their cell type; missing cells stay blank.
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Missing => {}
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}
