//! Registry page decoding
//!
//! A page looks like `{ "count": n, "next": "?page=2" | null, "list": [...] }`.
//! Entries of `list` are either records or envelopes that embed records
//! under their own `list` key; both shapes flatten to a record sequence.

use crate::registry::record::{json_kind, Column};
use crate::SchemaError;
use serde_json::{Map, Value};

/// One decoded page of the registry listing
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryPage {
    /// Total number of matching records, as reported by the registry
    pub count: Option<u64>,

    /// Opaque cursor for the next page; `None` ends the listing
    pub next: Option<String>,

    /// Raw records in the order the registry sent them
    pub records: Vec<Value>,
}

impl RegistryPage {
    /// Decodes a page body
    ///
    /// An empty (or whitespace-only) body, as sent with `204 No Content`,
    /// is a last page with no records.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page index, used in error messages
    /// * `body` - The raw response body
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the body is not JSON, is not an object,
    /// or carries a record that is not an object.
    pub fn decode(page: u32, body: &str) -> Result<Self, SchemaError> {
        if body.trim().is_empty() {
            tracing::debug!("Page {} has an empty body; treating as last page", page);
            return Ok(Self {
                count: None,
                next: None,
                records: Vec::new(),
            });
        }

        let value: Value =
            serde_json::from_str(body).map_err(|e| SchemaError::MalformedPage {
                page,
                message: e.to_string(),
            })?;

        let map = value.as_object().ok_or(SchemaError::PageNotObject {
            page,
            found: json_kind(&value),
        })?;

        let count = map.get("count").and_then(Value::as_u64);
        let next = match map.get("next") {
            Some(Value::String(cursor)) if !cursor.is_empty() => Some(cursor.clone()),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::warn!(
                    "Page {} has a non-string next cursor ({}); treating as last page",
                    page,
                    json_kind(other)
                );
                None
            }
        };

        let mut records = Vec::new();
        if let Some(list) = map.get("list") {
            collect_records(list, &mut records)?;
        }

        Ok(Self {
            count,
            next,
            records,
        })
    }
}

/// Flattens a `list` value into records
fn collect_records(list: &Value, out: &mut Vec<Value>) -> Result<(), SchemaError> {
    match list {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(map) if is_envelope(map) => {
                        collect_records(&map["list"], out)?;
                    }
                    Value::Object(_) => out.push(item.clone()),
                    other => {
                        return Err(SchemaError::RecordNotObject {
                            found: json_kind(other),
                        })
                    }
                }
            }
            Ok(())
        }
        Value::Object(map) if is_envelope(map) => collect_records(&map["list"], out),
        Value::Object(_) => {
            out.push(list.clone());
            Ok(())
        }
        other => Err(SchemaError::RecordNotObject {
            found: json_kind(other),
        }),
    }
}

/// An object that nests records under `list` and carries no record fields itself
fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("list") && !map.keys().any(|key| Column::from_key(key).is_some())
}
