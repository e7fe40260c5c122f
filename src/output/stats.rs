//! Per-column statistics of a harvested table
//!
//! This module summarizes how well each column is populated: how many cells
//! are empty, how many distinct values appear and which values dominate.

use crate::output::aggregate::{most_common, value_label};
use crate::registry::{is_empty_value, CollectionTable, Column};

/// Number of most-common values kept per column
pub const MOST_COMMON_LIMIT: usize = 10;

/// Population statistics of one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// The summarized column
    pub column: Column,

    /// Number of rows
    pub total: usize,

    /// Cells that are null, empty strings, empty lists or empty objects
    pub empty: usize,

    /// Distinct non-empty values
    pub unique: usize,

    /// Most frequent non-empty values, most frequent first
    pub most_common: Vec<(String, usize)>,
}

impl ColumnSummary {
    /// Number of populated cells
    pub fn filled(&self) -> usize {
        self.total - self.empty
    }

    /// Share of empty cells, in percent
    pub fn empty_percentage(&self) -> f64 {
        if self.total > 0 {
            (self.empty as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Summarizes one column
pub fn summarize_column(table: &CollectionTable, column: Column) -> ColumnSummary {
    let filled: Vec<String> = table
        .column(column)
        .filter(|cell| !is_empty_value(cell))
        .map(value_label)
        .collect();

    let ranked = most_common(filled.iter().cloned());
    let total = table.len();

    ColumnSummary {
        column,
        total,
        empty: total - filled.len(),
        unique: ranked.len(),
        most_common: ranked.into_iter().take(MOST_COMMON_LIMIT).collect(),
    }
}

/// Summarizes every column in table order
pub fn summarize_table(table: &CollectionTable) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .map(|column| summarize_column(table, *column))
        .collect()
}

/// Formats a column summary as a plain-text block
pub fn format_column_summary(summary: &ColumnSummary) -> String {
    let rule = "-".repeat(60);
    let mut text = String::new();

    text.push_str(&format!("{}\nColumn name: {}\n{}\n", rule, summary.column, rule));
    text.push_str(&format!("Total number of tags: {}\n", summary.filled()));
    text.push_str(&format!("Number of empty tags: {}\n", summary.empty));
    text.push_str(&format!(
        "Percentage of empty tags: {:.2}%\n",
        summary.empty_percentage()
    ));
    text.push_str(&format!("Number of unique tags: {}\n", summary.unique));
    text.push_str(&format!("{}\n", rule));

    if !summary.most_common.is_empty() {
        text.push_str("Most common tags:\n");
        for (label, count) in &summary.most_common {
            text.push_str(&format!("  {:>6}  {}\n", count, label));
        }
    }

    text
}
