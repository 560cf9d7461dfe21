//! Core fixed-width line parser
//!
//! A line is stripped, checked against the schema's total width, then sliced
//! at cumulative column widths. Offsets count characters, not bytes.

use std::path::Path;
use tracing::debug;

use super::field_parsers::convert_field;
use super::schema::SchemaDefinition;
use crate::app::models::{ColumnSpec, Value};
use crate::app::services::record_parser::RecordParser;
use crate::{Error, Result};

/// Parser for one fixed-width file type
#[derive(Debug, Clone)]
pub struct FixedWidthParser {
    schema: SchemaDefinition,
}

impl FixedWidthParser {
    /// Create a parser bound to an already loaded schema
    pub fn new(schema: SchemaDefinition) -> Self {
        Self { schema }
    }

    /// Load the schema resource at `path` and bind a parser to it
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(SchemaDefinition::load(path)?))
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }
}

impl RecordParser for FixedWidthParser {
    fn parse(&self, line: &str) -> Result<Vec<Value>> {
        let line = line.trim();

        // Byte position of every character, plus the end of the line
        let boundaries: Vec<usize> = line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .collect();
        let length = boundaries.len() - 1;

        if length != self.schema.total_width() {
            debug!(
                "Malformed line <{}>: {} chars, expected {}",
                line,
                length,
                self.schema.total_width()
            );
            return Err(Error::malformed_line(line, length, &self.schema.widths()));
        }

        let mut values = Vec::with_capacity(self.schema.columns().len());
        let mut offset = 0;
        for (index, column) in self.schema.columns().iter().enumerate() {
            let end = offset + column.width;
            let slice = &line[boundaries[offset]..boundaries[end]];
            values.push(convert_field(column, index, offset, slice)?);
            offset = end;
        }

        Ok(values)
    }

    fn columns(&self) -> &[ColumnSpec] {
        self.schema.columns()
    }

    fn table_name(&self) -> &str {
        self.schema.table_name()
    }
}
