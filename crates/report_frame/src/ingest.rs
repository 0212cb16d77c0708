//! Reading uploaded bytes into a [`Frame`].
//!
//! CSV cells are typed per column: integers, then floats, then booleans,
//! falling back to the original text. Standard NA markers are read as
//! missing. XLSX input reads the first worksheet with its first non-empty
//! row as the header. Column names are normalized in both cases.

use anyhow::{Result, anyhow, bail};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use std::io::Cursor;
use tracing::debug;

use crate::frame::{CellValue, Column, ColumnKind, Frame};
use crate::normalize::normalize_headers;

/// Cell contents read as missing.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_VALUES: &[&str] = &["True", "true", "TRUE"];
const FALSE_VALUES: &[&str] = &["False", "false", "FALSE"];

/// Largest magnitude at which an integral spreadsheet float is read as an integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Maps a file extension (any case, no dot) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Parses `bytes` in the given format.
pub fn read_frame(bytes: &[u8], format: SourceFormat) -> Result<Frame> {
    match format {
        SourceFormat::Csv => read_csv(bytes),
        SourceFormat::Xlsx => read_xlsx(bytes),
    }
}

// ── CSV ───────────────────────────────────────────────────────────────

/// Parses CSV bytes. The first record is the header; empty lines are skipped.
pub fn read_csv(bytes: &[u8]) -> Result<Frame> {
    let input = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    // The reader skips empty lines itself. A quoted `""` line is a real
    // record holding one empty field.
    let header = match records.next() {
        None => bail!("No columns to parse from file"),
        Some(record) => record.map_err(|e| anyhow!("Error tokenizing data. {e}"))?,
    };
    let headers: Vec<String> = header.iter().map(String::from).collect();
    let n_cols = headers.len();

    // Column-major raw text; `None` marks an NA cell.
    let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); n_cols];
    for record in records {
        let record = record.map_err(|e| anyhow!("Error tokenizing data. {e}"))?;
        if record.len() > n_cols {
            let line = record.position().map_or(0, |p| p.line());
            bail!(
                "Error tokenizing data. Expected {n_cols} fields in line {line}, saw {}",
                record.len()
            );
        }
        for (col_idx, column) in raw_columns.iter_mut().enumerate() {
            let field = record.get(col_idx);
            column.push(field.filter(|f| !is_na(f)).map(String::from));
        }
    }

    let names = normalize_headers(&headers);
    let mut frame = Frame::new();
    for (name, raw) in names.into_iter().zip(raw_columns) {
        frame.add_column(build_text_column(name, raw))?;
    }
    debug!(
        rows = frame.row_count(),
        columns = frame.column_count(),
        "Parsed CSV input"
    );
    Ok(frame)
}

fn is_na(field: &str) -> bool {
    NA_VALUES.contains(&field)
}

/// Types a column of raw CSV text. Text columns keep the source text verbatim.
fn build_text_column(name: String, raw: Vec<Option<String>>) -> Column {
    let parsed: Vec<CellValue> = raw
        .iter()
        .map(|cell| cell.as_deref().map_or(CellValue::Missing, parse_field))
        .collect();

    if ColumnKind::infer(&parsed) == ColumnKind::Text {
        let verbatim = raw
            .into_iter()
            .map(|cell| cell.map_or(CellValue::Missing, CellValue::Text))
            .collect();
        Column::from_cells(name, verbatim)
    } else {
        Column::from_cells(name, parsed)
    }
}

/// Reads one non-NA CSV field.
pub fn parse_field(field: &str) -> CellValue {
    if TRUE_VALUES.contains(&field) {
        return CellValue::Bool(true);
    }
    if FALSE_VALUES.contains(&field) {
        return CellValue::Bool(false);
    }
    let trimmed = field.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }
    if looks_numeric(trimmed) {
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
    }
    CellValue::Text(field.to_string())
}

/// Rejects words Rust's float parser accepts but spreadsheets treat as text
/// (`infinity`, `NAN`, …), while keeping `inf` and `-inf`.
fn looks_numeric(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

// ── XLSX ──────────────────────────────────────────────────────────────

/// Parses the first worksheet of an XLSX workbook. The first non-empty row
/// is the header; columns are counted from column A.
pub fn read_xlsx(bytes: &[u8]) -> Result<Frame> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).map_err(|e| anyhow!("{e}"))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook contains no worksheets"))?
        .map_err(|e| anyhow!("{e}"))?;

    // The used range starts at the first non-empty cell. Columns left of it
    // still count; rows with no value at all are skipped, as CSV blank lines are.
    let col_offset = range.start().map_or(0, |(_, col)| col as usize);
    let mut rows = range
        .rows()
        .filter(|row| !row.iter().all(|cell| sheet_cell(cell).is_missing()));
    let header_row = rows
        .next()
        .ok_or_else(|| anyhow!("No columns to parse from file"))?;
    let headers: Vec<String> = std::iter::repeat_n(String::new(), col_offset)
        .chain(header_row.iter().map(header_text))
        .collect();

    let mut cell_columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, column) in cell_columns.iter_mut().enumerate() {
            let cell = col_idx.checked_sub(col_offset).and_then(|i| row.get(i));
            column.push(cell.map_or(CellValue::Missing, sheet_cell));
        }
    }

    let names = normalize_headers(&headers);
    let mut frame = Frame::new();
    for (name, cells) in names.into_iter().zip(cell_columns) {
        frame.add_column(Column::from_cells(name, cells))?;
    }
    debug!(
        rows = frame.row_count(),
        columns = frame.column_count(),
        "Parsed XLSX input"
    );
    Ok(frame)
}

fn header_text(cell: &Data) -> String {
    match sheet_cell(cell) {
        CellValue::Missing => String::new(),
        other => other.to_string(),
    }
}

fn sheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => float_cell(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if is_na(s) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => CellValue::Text(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => float_cell(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Spreadsheets store every number as a float; integral ones read as integers.
fn float_cell(f: f64) -> CellValue {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}
