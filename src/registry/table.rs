//! The accumulated collection table

use crate::registry::record::{Column, Row};
use serde::Serialize;
use serde_json::Value;

/// Rows in arrival order across all harvested pages
///
/// Only the harvester appends; callers get a read-only view. Every row has
/// the same column set, so the table is always rectangular.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CollectionTable {
    rows: Vec<Row>,
}

impl CollectionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    /// The column set shared by every row
    pub fn columns(&self) -> &'static [Column] {
        &Column::ALL
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, column: Column) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Non-empty string values of the homepage column, in row order
    ///
    /// This is the usual input for the endpoint prober.
    pub fn homepages(&self) -> Vec<String> {
        self.column(Column::Homepage)
            .filter_map(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl<'a> IntoIterator for &'a CollectionTable {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
