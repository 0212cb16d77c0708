//! Column-major tabular frame.
//!
//! A [`Frame`] is an ordered list of named [`Column`]s of equal length. Each
//! column carries a [`ColumnKind`] inferred from its cells, mirroring how a
//! spreadsheet sheet is read into typed columns.

use anyhow::{Result, bail};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

// ── CellValue ─────────────────────────────────────────────────────────

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric value of an `Int` or `Float` cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Renders the cell the way it is written to text outputs: missing cells are
/// empty, floats keep a fractional part, booleans are `True`/`False`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip form, with `.0` appended to integral values.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ── ColumnKind ────────────────────────────────────────────────────────

/// Type of a column, inferred from its non-missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    /// Integer and float columns take part in summary statistics.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Infers the kind of a column from its cells.
    ///
    /// Missing cells force integers to widen to floats and booleans to text.
    /// A non-empty column of only missing cells is `Float`; an empty column
    /// is `Text`.
    pub fn infer(cells: &[CellValue]) -> Self {
        if cells.is_empty() {
            return Self::Text;
        }

        let mut has_missing = false;
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;
        let mut has_text = false;
        for cell in cells {
            match cell {
                CellValue::Missing => has_missing = true,
                CellValue::Int(_) => has_int = true,
                CellValue::Float(_) => has_float = true,
                CellValue::Bool(_) => has_bool = true,
                CellValue::Text(_) => has_text = true,
            }
        }

        if has_text || (has_bool && (has_int || has_float)) {
            Self::Text
        } else if has_bool {
            if has_missing { Self::Text } else { Self::Boolean }
        } else if has_float || has_missing {
            Self::Float
        } else {
            Self::Integer
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Text => write!(f, "text"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<CellValue>,
}

impl Column {
    /// Builds a column, inferring its kind and coercing cells to it:
    /// integers widen to floats in a `Float` column, and every non-missing
    /// cell of a `Text` column becomes text.
    pub fn from_cells(name: impl Into<String>, mut values: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&values);
        match kind {
            ColumnKind::Float => {
                for cell in &mut values {
                    if let CellValue::Int(i) = *cell {
                        *cell = CellValue::Float(i as f64);
                    }
                }
            }
            ColumnKind::Text => {
                for cell in &mut values {
                    if !matches!(cell, CellValue::Missing | CellValue::Text(_)) {
                        *cell = CellValue::Text(cell.to_string());
                    }
                }
            }
            ColumnKind::Integer | ColumnKind::Boolean => {}
        }
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-missing numeric values, in row order. Empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        if !self.kind.is_numeric() {
            return Vec::new();
        }
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }
}

// ── Frame ─────────────────────────────────────────────────────────────

/// Ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    row_count: usize,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame, rejecting ragged columns and duplicate names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut frame = Self::new();
        for column in columns {
            frame.add_column(column)?;
        }
        Ok(frame)
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.row_count {
            bail!(
                "column '{}' has {} rows, expected {}",
                column.name(),
                column.len(),
                self.row_count
            );
        }
        if self.columns.iter().any(|c| c.name() == column.name()) {
            bail!("duplicate column name '{}'", column.name());
        }
        self.row_count = column.len();
        self.columns.push(column);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind().is_numeric())
    }

    /// Cells of row `idx`, in column order.
    pub fn row(&self, idx: usize) -> impl Iterator<Item = &CellValue> {
        self.columns.iter().map(move |c| &c.values[idx])
    }

    /// Rows in `range` rendered as display strings.
    pub fn row_strings(&self, range: Range<usize>) -> Vec<Vec<String>> {
        let end = range.end.min(self.row_count);
        (range.start.min(end)..end)
            .map(|idx| self.row(idx).map(ToString::to_string).collect())
            .collect()
    }

    /// Replaces every column name at once, rejecting duplicates.
    pub(crate) fn set_column_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.columns.len() {
            bail!(
                "expected {} column names, got {}",
                self.columns.len(),
                names.len()
            );
        }
        let unique: HashSet<&String> = names.iter().collect();
        if unique.len() != names.len() {
            bail!("column names are not unique");
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.rename(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Int(*v)).collect()
    }

    #[test]
    fn test_infer_integer_column() {
        let col = Column::from_cells("a", ints(&[1, 2, 3]));
        assert_eq!(col.kind(), ColumnKind::Integer);
        assert!(col.kind().is_numeric());
    }

    #[test]
    fn test_integers_with_missing_widen_to_float() {
        let col = Column::from_cells(
            "a",
            vec![CellValue::Int(1), CellValue::Missing, CellValue::Int(3)],
        );
        assert_eq!(col.kind(), ColumnKind::Float);
        assert_eq!(col.values()[0], CellValue::Float(1.0));
        assert_eq!(col.numeric_values(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let col = Column::from_cells("a", vec![CellValue::Missing, CellValue::Missing]);
        assert_eq!(col.kind(), ColumnKind::Float);
        assert!(col.numeric_values().is_empty());
    }

    #[test]
    fn test_empty_column_is_text() {
        assert_eq!(ColumnKind::infer(&[]), ColumnKind::Text);
    }

    #[test]
    fn test_booleans_are_not_numeric() {
        let col = Column::from_cells("flag", vec![CellValue::Bool(true), CellValue::Bool(false)]);
        assert_eq!(col.kind(), ColumnKind::Boolean);
        assert!(!col.kind().is_numeric());
        assert!(col.numeric_values().is_empty());
    }

    #[test]
    fn test_booleans_with_missing_become_text() {
        let col = Column::from_cells("flag", vec![CellValue::Bool(true), CellValue::Missing]);
        assert_eq!(col.kind(), ColumnKind::Text);
        assert_eq!(col.values()[0], CellValue::Text("True".into()));
        assert_eq!(col.values()[1], CellValue::Missing);
    }

    #[test]
    fn test_mixed_text_and_numbers_become_text() {
        let col = Column::from_cells(
            "a",
            vec![CellValue::Int(1), CellValue::Text("x".into()), CellValue::Float(2.5)],
        );
        assert_eq!(col.kind(), ColumnKind::Text);
        assert_eq!(col.values()[0], CellValue::Text("1".into()));
        assert_eq!(col.values()[2], CellValue::Text("2.5".into()));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(CellValue::Missing.to_string(), "");
        assert_eq!(CellValue::Int(-4).to_string(), "-4");
        assert_eq!(CellValue::Float(3.0).to_string(), "3.0");
        assert_eq!(CellValue::Float(2.25).to_string(), "2.25");
        assert_eq!(CellValue::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(CellValue::Bool(false).to_string(), "False");
        assert_eq!(CellValue::Text("hi".into()).to_string(), "hi");
    }

    #[test]
    fn test_frame_rejects_ragged_columns() {
        let mut frame = Frame::new();
        frame.add_column(Column::from_cells("a", ints(&[1, 2]))).unwrap();
        let err = frame.add_column(Column::from_cells("b", ints(&[1]))).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_frame_rejects_duplicate_names() {
        let result = Frame::from_columns(vec![
            Column::from_cells("a", ints(&[1])),
            Column::from_cells("a", ints(&[2])),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_row_strings_clamps_range() {
        let frame = Frame::from_columns(vec![
            Column::from_cells("a", ints(&[1, 2, 3])),
            Column::from_cells(
                "b",
                vec![
                    CellValue::Text("x".into()),
                    CellValue::Missing,
                    CellValue::Text("z".into()),
                ],
            ),
        ])
        .unwrap();

        let rows = frame.row_strings(1..10);
        assert_eq!(rows, vec![vec!["2", ""], vec!["3", "z"]]);
        assert!(frame.row_strings(5..8).is_empty());
    }

    #[test]
    fn test_numeric_columns_filters_by_kind() {
        let frame = Frame::from_columns(vec![
            Column::from_cells("n", ints(&[1])),
            Column::from_cells("t", vec![CellValue::Text("x".into())]),
            Column::from_cells("f", vec![CellValue::Float(0.5)]),
        ])
        .unwrap();
        let names: Vec<&str> = frame.numeric_columns().map(Column::name).collect();
        assert_eq!(names, vec!["n", "f"]);
    }

    #[test]
    fn test_set_column_names_rejects_duplicates() {
        let mut frame = Frame::from_columns(vec![
            Column::from_cells("a", ints(&[1])),
            Column::from_cells("b", ints(&[2])),
        ])
        .unwrap();
        assert!(frame.set_column_names(vec!["x".into(), "x".into()]).is_err());
        frame.set_column_names(vec!["x".into(), "y".into()]).unwrap();
        assert_eq!(frame.column_names(), vec!["x", "y"]);
    }
}
