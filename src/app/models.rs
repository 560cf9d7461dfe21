//! Data models for fixed-width loading
//!
//! This module contains the core data structures shared by the parser, the
//! storage backends and the file orchestrator: column descriptors, typed
//! values, named rows, data file names and per-file outcomes.

use crate::constants::FILE_NAME_SEPARATOR;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// =============================================================================
// Column Types and Values
// =============================================================================

/// Scalar types a schema column may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// Free text, stripped of surrounding whitespace
    Text,
    /// Signed base-10 integer
    Integer,
    /// Integer-gated boolean: zero is false, anything else is true
    Boolean,
}

impl DataType {
    /// All supported types in declaration order
    pub const ALL: [DataType; 3] = [DataType::Text, DataType::Integer, DataType::Boolean];

    /// Resolve a declared type name from a schema resource
    ///
    /// Names are matched exactly after trimming (`TEXT`, `INTEGER`, `BOOLEAN`).
    pub fn from_declared(column: &str, declared: &str) -> Result<Self> {
        match declared.trim() {
            "TEXT" => Ok(DataType::Text),
            "INTEGER" => Ok(DataType::Integer),
            "BOOLEAN" => Ok(DataType::Boolean),
            other => Err(Error::unsupported_type(column, other)),
        }
    }

    /// Schema spelling of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "TEXT",
            DataType::Integer => "INTEGER",
            DataType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A converted field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// Type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Text(_) => DataType::Text,
            Value::Integer(_) => DataType::Integer,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

// =============================================================================
// Schema Columns
// =============================================================================

/// One column descriptor of a fixed-width schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, used as the table column and row key
    pub name: String,

    /// Fixed width in characters (always positive)
    pub width: usize,

    /// Declared scalar type
    pub data_type: DataType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, width: usize, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            width,
            data_type,
        }
    }
}

// =============================================================================
// Named Rows
// =============================================================================

/// A parsed line keyed by column name, in schema column order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub(crate) fn from_fields(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Look up a value by column name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Data File Names
// =============================================================================

/// File type and drop date derived from `<file_type>_<drop_date>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFileName {
    /// Schema lookup key; may itself contain underscores
    pub file_type: String,

    /// Final underscore-delimited segment, not validated as a date
    pub drop_date: String,
}

impl DataFileName {
    /// Split a data file name on its last underscore-delimited segment
    ///
    /// The extension is removed first. Names with fewer than two segments, or
    /// with an empty type or date segment, are rejected.
    pub fn parse(file_name: &str) -> Result<Self> {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::invalid_file_name(file_name))?;

        let (file_type, drop_date) = stem
            .rsplit_once(FILE_NAME_SEPARATOR)
            .ok_or_else(|| Error::invalid_file_name(file_name))?;

        if file_type.is_empty() || drop_date.is_empty() {
            return Err(Error::invalid_file_name(file_name));
        }

        Ok(Self {
            file_type: file_type.to_string(),
            drop_date: drop_date.to_string(),
        })
    }
}

// =============================================================================
// File Outcomes
// =============================================================================

/// Terminal placement of a processed data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    /// Every parsed row was persisted; file moved to the archive directory
    Archived,
    /// Parsing, persistence or the row count check failed; file moved to the failure directory
    Failed,
}

impl LoadOutcome {
    pub fn from_success(success: bool) -> Self {
        if success {
            LoadOutcome::Archived
        } else {
            LoadOutcome::Failed
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadOutcome::Archived)
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Archived => f.write_str("archived"),
            LoadOutcome::Failed => f.write_str("failed"),
        }
    }
}
