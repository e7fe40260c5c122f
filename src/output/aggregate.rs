//! Aggregates consumed by charting and reporting
//!
//! Chart rendering itself lives outside this crate; these functions produce
//! the finished series it needs.

use crate::registry::{CollectionTable, Column};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Label used for null cells in frequency tables
pub const NULL_LABEL: &str = "None";

/// Renders a cell as a frequency-table label
///
/// Strings are used verbatim, `null` becomes [`NULL_LABEL`], anything else
/// is its compact JSON text.
pub fn value_label(value: &Value) -> String {
    match value {
        Value::Null => NULL_LABEL.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Counts occurrences, most frequent first
///
/// Ties keep the order in which the values first appeared.
pub fn most_common<I, S>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        let entry = counts.entry(value.into()).or_insert((0, position));
        entry.0 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .map(|(label, (count, _))| (label, count))
        .collect()
}

/// The `n` most common values; the input of a horizontal bar chart
pub fn top_n<I, S>(values: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut ranked = most_common(values);
    ranked.truncate(n);
    ranked
}

/// Parses the registry's ISO-8601 timestamps
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    let trimmed = text.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Number of dates per calendar year, ascending by year
///
/// Unparseable dates are skipped. This is the series behind the
/// per-year time evolution chart.
pub fn yearly_counts<'a, I>(dates: I) -> BTreeMap<i32, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    use chrono::Datelike;

    let mut counts = BTreeMap::new();
    for text in dates {
        match parse_date(text) {
            Some(date) => *counts.entry(date.year()).or_insert(0) += 1,
            None => tracing::debug!("Skipping unparseable date {:?}", text),
        }
    }
    counts
}

/// Yearly counts of a date column
pub fn yearly_counts_for(table: &CollectionTable, column: Column) -> BTreeMap<i32, usize> {
    yearly_counts(table.column(column).filter_map(Value::as_str))
}

/// Flattens a list-valued column into labels
///
/// Registry lists hold either plain strings or objects carrying a `term`
/// (topics, operating systems, languages). Other objects fall back to their
/// JSON text. Scalar cells count as a single label; null cells as
/// [`NULL_LABEL`].
pub fn column_terms(table: &CollectionTable, column: Column) -> Vec<String> {
    let mut terms = Vec::new();
    for cell in table.column(column) {
        match cell {
            Value::Array(items) => terms.extend(items.iter().map(term_label)),
            other => terms.push(term_label(other)),
        }
    }
    terms
}

fn term_label(value: &Value) -> String {
    match value.get("term").and_then(Value::as_str) {
        Some(term) => term.to_string(),
        None => value_label(value),
    }
}
