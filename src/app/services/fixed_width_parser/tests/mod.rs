//! Test utilities for fixed-width parser testing
//!
//! Shared schema fixtures and helpers used across the parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;

use super::{FixedWidthParser, SchemaDefinition};


/// Schema with a text, a boolean and an integer column (total width 14)
pub const TEST_SCHEMA: &str = "\"column name\",width,datatype\n\
name,10,TEXT\n\
\n\
valid,1,BOOLEAN\n\
\n\
count,3,INTEGER\n";

/// Helper to build the standard test parser
pub fn create_test_parser() -> FixedWidthParser {
    let schema = SchemaDefinition::from_reader("test/formatname.csv", TEST_SCHEMA.as_bytes())
        .expect("test schema should load");
    FixedWidthParser::new(schema)
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
