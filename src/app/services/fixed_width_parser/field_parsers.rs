//! Field conversion utilities for fixed-width slices
//!
//! Each slice is stripped of surrounding whitespace before conversion.

use crate::app::models::{ColumnSpec, DataType, Value};
use crate::{Error, Result};

/// Parse a signed base-10 integer (optional leading sign, digits only)
pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Parse an integer-gated boolean: zero is false, any other integer is true
///
/// Text such as `true` or `yes` is not recognised.
pub fn parse_boolean(value: &str) -> Option<bool> {
    parse_integer(value).map(|n| n != 0)
}

/// Convert one field slice according to its column's declared type
///
/// `index` and `offset` locate the field within the line for diagnostics.
pub fn convert_field(column: &ColumnSpec, index: usize, offset: usize, raw: &str) -> Result<Value> {
    let value = raw.trim();

    let converted = match column.data_type {
        DataType::Text => Some(Value::Text(value.to_string())),
        DataType::Integer => parse_integer(value).map(Value::Integer),
        DataType::Boolean => parse_boolean(value).map(Value::Boolean),
    };

    converted.ok_or_else(|| {
        Error::value_conversion(&column.name, index, offset, column.data_type.as_str(), value)
    })
}
