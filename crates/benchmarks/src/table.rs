//! Text table output for benchmark records.
//!
//! This module renders selected record fields as rows of a typeset table:
//! cells are joined by ` & ` and rows end with `\\`. In every numeric column
//! the smallest value is wrapped in [`BOLD_OPEN`]/[`BOLD_CLOSE`].

use crate::format::NumberFormat;
use crate::record::BenchmarkRecord;

/// Key that selects the record's display name instead of a field.
pub const NAME_KEY: &str = "name";

/// Placeholder for missing values.
pub const MISSING: &str = "-";

/// Opening delimiter of the bold markup.
pub const BOLD_OPEN: &str = "\\textbf{";

/// Closing delimiter of the bold markup.
pub const BOLD_CLOSE: &str = "}";

/// Cell separator.
pub const SEPARATOR: &str = " & ";

/// Row terminator.
pub const ROW_END: &str = " \\\\";

/// How a column renders its values.
#[derive(Debug, Clone)]
pub enum ColumnKind {
    /// Plain text, right-padded to the widest entry.
    Text,
    /// Formatted number with the minimum entry emphasized.
    Numeric(NumberFormat),
}

/// One table column.
#[derive(Debug, Clone)]
pub struct Column {
    /// Field key, or [`NAME_KEY`].
    pub key: String,
    /// Rendering of the column.
    pub kind: ColumnKind,
}

impl Column {
    /// The record name as a text column.
    pub fn name() -> Self {
        Self::text(NAME_KEY)
    }

    /// A text column.
    pub fn text(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: ColumnKind::Text,
        }
    }

    /// A numeric column.
    pub fn numeric(key: impl Into<String>, format: NumberFormat) -> Self {
        Self {
            key: key.into(),
            kind: ColumnKind::Numeric(format),
        }
    }
}

fn text_cell(record: &BenchmarkRecord, key: &str) -> String {
    if key == NAME_KEY {
        return record.name().to_string();
    }
    match record.scalar(key) {
        Some(value) => value.to_string(),
        None => MISSING.to_string(),
    }
}

/// Index of the smallest value, first occurrence winning ties.
/// Missing values never win.
fn min_index(values: &[Option<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in values.iter().enumerate() {
        if let Some(v) = value {
            if best.map_or(true, |(_, b)| *v < b) {
                best = Some((i, *v));
            }
        }
    }
    best.map(|(i, _)| i)
}

fn render_column(records: &[BenchmarkRecord], column: &Column) -> Vec<String> {
    match &column.kind {
        ColumnKind::Text => {
            let cells: Vec<String> = records.iter().map(|r| text_cell(r, &column.key)).collect();
            let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
            cells
                .into_iter()
                .map(|c| format!("{c:<width$}"))
                .collect()
        }
        ColumnKind::Numeric(format) => {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.scalar(&column.key)).collect();
            let min = min_index(&values);
            values
                .iter()
                .enumerate()
                .map(|(i, value)| match value {
                    Some(v) if Some(i) == min => {
                        format!("{BOLD_OPEN}{}{BOLD_CLOSE}", format.format(*v))
                    }
                    Some(v) => format.format(*v),
                    None => MISSING.to_string(),
                })
                .collect()
        }
    }
}

/// Format records as table rows, one line per record in the given order.
pub fn format_table(records: &[BenchmarkRecord], columns: &[Column]) -> String {
    let rendered: Vec<Vec<String>> = columns.iter().map(|c| render_column(records, c)).collect();

    let mut output = String::new();
    for row in 0..records.len() {
        let cells: Vec<&str> = rendered.iter().map(|col| col[row].as_str()).collect();
        output.push_str(&cells.join(SEPARATOR));
        output.push_str(ROW_END);
        output.push('\n');
    }
    output
}
