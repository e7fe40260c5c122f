//! Record normalization
//!
//! Every raw record becomes exactly one [`Row`] holding one cell per
//! [`Column`], in vocabulary order. Absent fields become `null`.

use crate::SchemaError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// The fixed field vocabulary of a registry record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Name,
    Description,
    Homepage,
    BiotoolsId,
    BiotoolsCurie,
    Version,
    OtherId,
    Relation,
    Function,
    ToolType,
    Topic,
    OperatingSystem,
    Language,
    License,
    CollectionId,
    Maturity,
    Cost,
    Accessibility,
    ElixirPlatform,
    ElixirNode,
    ElixirCommunity,
    Link,
    Download,
    Documentation,
    Publication,
    Credit,
    Owner,
    AdditionDate,
    LastUpdate,
    EditPermission,
    Validated,
    HomepageStatus,
    ElixirBadge,
    ConfidenceFlag,
}

impl Column {
    /// All columns in table order
    pub const ALL: [Column; 34] = [
        Column::Name,
        Column::Description,
        Column::Homepage,
        Column::BiotoolsId,
        Column::BiotoolsCurie,
        Column::Version,
        Column::OtherId,
        Column::Relation,
        Column::Function,
        Column::ToolType,
        Column::Topic,
        Column::OperatingSystem,
        Column::Language,
        Column::License,
        Column::CollectionId,
        Column::Maturity,
        Column::Cost,
        Column::Accessibility,
        Column::ElixirPlatform,
        Column::ElixirNode,
        Column::ElixirCommunity,
        Column::Link,
        Column::Download,
        Column::Documentation,
        Column::Publication,
        Column::Credit,
        Column::Owner,
        Column::AdditionDate,
        Column::LastUpdate,
        Column::EditPermission,
        Column::Validated,
        Column::HomepageStatus,
        Column::ElixirBadge,
        Column::ConfidenceFlag,
    ];

    /// The JSON key the registry uses for this column
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Homepage => "homepage",
            Self::BiotoolsId => "biotoolsID",
            Self::BiotoolsCurie => "biotoolsCURIE",
            Self::Version => "version",
            Self::OtherId => "otherID",
            Self::Relation => "relation",
            Self::Function => "function",
            Self::ToolType => "toolType",
            Self::Topic => "topic",
            Self::OperatingSystem => "operatingSystem",
            Self::Language => "language",
            Self::License => "license",
            Self::CollectionId => "collectionID",
            Self::Maturity => "maturity",
            Self::Cost => "cost",
            Self::Accessibility => "accessibility",
            Self::ElixirPlatform => "elixirPlatform",
            Self::ElixirNode => "elixirNode",
            Self::ElixirCommunity => "elixirCommunity",
            Self::Link => "link",
            Self::Download => "download",
            Self::Documentation => "documentation",
            Self::Publication => "publication",
            Self::Credit => "credit",
            Self::Owner => "owner",
            Self::AdditionDate => "additionDate",
            Self::LastUpdate => "lastUpdate",
            Self::EditPermission => "editPermission",
            Self::Validated => "validated",
            Self::HomepageStatus => "homepage_status",
            Self::ElixirBadge => "elixir_badge",
            Self::ConfidenceFlag => "confidence_flag",
        }
    }

    /// Looks a column up by its registry key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|column| column.key() == key)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One normalized record: exactly one cell per [`Column`]
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Value>,
}

impl Row {
    /// Returns the cell for a column; `Value::Null` when the record lacked it
    pub fn get(&self, column: Column) -> &Value {
        &self.cells[column.index()]
    }

    /// Returns the cell as a string slice, if it holds a string
    pub fn get_str(&self, column: Column) -> Option<&str> {
        self.get(column).as_str()
    }

    /// Iterates `(column, cell)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        Column::ALL.iter().copied().zip(self.cells.iter())
    }

    /// Number of cells, always `Column::ALL.len()`
    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in self.iter() {
            map.serialize_entry(column.key(), cell)?;
        }
        map.end()
    }
}

/// Normalizes one raw registry record into a [`Row`]
///
/// Known fields are copied, unknown keys are ignored and absent fields
/// become `null`. Newlines inside top-level text cells are replaced by a
/// single space.
///
/// # Errors
///
/// Returns [`SchemaError::RecordNotObject`] if `raw` is not a JSON object.
pub fn normalize(raw: &Value) -> Result<Row, SchemaError> {
    let map = raw.as_object().ok_or(SchemaError::RecordNotObject {
        found: json_kind(raw),
    })?;

    let cells = Column::ALL
        .iter()
        .map(|column| match map.get(column.key()) {
            Some(Value::String(text)) => Value::String(clean_text(text)),
            Some(value) => value.clone(),
            None => Value::Null,
        })
        .collect();

    Ok(Row { cells })
}

/// Replaces line breaks with a single space
///
/// A `\r\n` pair is one line break and becomes one space, so no stray
/// carriage return is left in the cell. A lone `\r` is kept.
pub fn clean_text(text: &str) -> String {
    if text.contains('\n') {
        text.replace("\r\n", " ").replace('\n', " ")
    } else {
        text.to_string()
    }
}

/// True for `null`, empty strings, empty lists and empty objects
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Human-readable name of a JSON value's type
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
