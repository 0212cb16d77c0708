//! Descriptive statistics per numeric column.

use crate::frame::{CellValue, Column, Frame};

/// Row labels of a summary, in output order.
pub const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Name of the label column in [`Summary::to_frame`].
pub const STATISTIC_COLUMN: &str = "Statistic";

/// Statistics of one numeric column, aligned with [`STATISTICS`]. `None`
/// where a statistic is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub values: [Option<f64>; 8],
}

impl ColumnSummary {
    pub fn get(&self, statistic: &str) -> Option<f64> {
        let idx = STATISTICS.iter().position(|s| *s == statistic)?;
        self.values[idx]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    columns: Vec<ColumnSummary>,
}

impl Summary {
    /// True when the source frame had no numeric columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnSummary] {
        &self.columns
    }

    /// Tabular form: a `Statistic` label column, then one float column per
    /// numeric source column.
    pub fn to_frame(&self) -> Frame {
        let labels = STATISTICS
            .iter()
            .map(|s| CellValue::Text((*s).to_string()))
            .collect();
        let mut columns = vec![Column::from_cells(STATISTIC_COLUMN, labels)];

        for summary in &self.columns {
            let cells = summary
                .values
                .iter()
                .map(|v| v.map_or(CellValue::Missing, CellValue::Float))
                .collect();
            columns.push(Column::from_cells(summary.name.clone(), cells));
        }

        // Source names are unique and lowercase, so they never clash with the label column.
        Frame::from_columns(columns).unwrap_or_default()
    }
}

/// Computes count, mean, sample std, min, quartiles and max for every
/// numeric column, rounded to two decimals.
pub fn summarize(frame: &Frame) -> Summary {
    let columns = frame
        .numeric_columns()
        .map(|column| ColumnSummary {
            name: column.name().to_string(),
            values: describe(column.numeric_values()).map(|v| v.map(round2)),
        })
        .collect();
    Summary { columns }
}

fn describe(mut values: Vec<f64>) -> [Option<f64>; 8] {
    let n = values.len();
    if n == 0 {
        return [Some(0.0), None, None, None, None, None, None, None];
    }
    values.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    [
        Some(n as f64),
        Some(mean),
        std,
        Some(values[0]),
        Some(quantile(&values, 0.25)),
        Some(quantile(&values, 0.50)),
        Some(quantile(&values, 0.75)),
        Some(values[n - 1]),
    ]
}

/// Linear interpolation between closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

/// Two decimals, ties to even on the scaled value.
fn round2(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    (v * 100.0).round_ties_even() / 100.0
}
