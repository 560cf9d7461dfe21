//! Pairing parsed values with column names

use crate::app::models::{Row, Value};
use crate::{Error, Result};

/// Zip column names with one line's values into a named row
///
/// The pairing is positional and one-to-one; both sequences must have the
/// same length.
pub fn build_row<S: AsRef<str>>(field_names: &[S], values: Vec<Value>) -> Result<Row> {
    if field_names.len() != values.len() {
        return Err(Error::RowShape {
            names: field_names.len(),
            values: values.len(),
        });
    }

    let fields = field_names
        .iter()
        .map(|name| name.as_ref().to_string())
        .zip(values)
        .collect();

    Ok(Row::from_fields(fields))
}
