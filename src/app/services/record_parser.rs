//! Capability interface shared by all data file parsers
//!
//! The orchestrator only talks to parsers through [`RecordParser`]; concrete
//! parsers are created from a schema resource by factories registered in
//! [`crate::app::services::registry`].

use crate::Result;
use crate::app::models::{ColumnSpec, Row, Value};
use crate::app::services::fixed_width_parser::build_row;

/// A parser bound to one file type's schema
pub trait RecordParser: std::fmt::Debug {
    /// Parse a single raw line into values in column order
    fn parse(&self, line: &str) -> Result<Vec<Value>>;

    /// Column descriptors in schema order
    fn columns(&self) -> &[ColumnSpec];

    /// Destination table for rows produced by this parser
    fn table_name(&self) -> &str;

    /// Column names in schema order
    fn field_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name.as_str()).collect()
    }

    /// Parse a line and pair each value with its column name
    fn parse_row(&self, line: &str) -> Result<Row> {
        let values = self.parse(line)?;
        build_row(&self.field_names(), values)
    }
}
