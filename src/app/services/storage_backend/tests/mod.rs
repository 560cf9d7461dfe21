//! Test utilities for storage backend testing

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::app::models::{ColumnSpec, DataType, Row, Value};
use crate::app::services::fixed_width_parser::build_row;


pub const TABLE_NAME: &str = "test_table";

/// Foo TEXT, Bar INTEGER, Baz BOOLEAN
pub fn test_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Foo", 3, DataType::Text),
        ColumnSpec::new("Bar", 2, DataType::Integer),
        ColumnSpec::new("Baz", 1, DataType::Boolean),
    ]
}

pub fn test_row(foo: &str, bar: i64, baz: bool) -> Row {
    build_row(
        &["Foo", "Bar", "Baz"],
        vec![Value::from(foo), Value::from(bar), Value::from(baz)],
    )
    .unwrap()
}

/// Seven well-formed rows
pub fn good_rows() -> Vec<Row> {
    vec![
        test_row("foo", 1, true),
        test_row("bar", 2, false),
        test_row("baz", 3, true),
        test_row("qux", 4, false),
        test_row("one", -5, true),
        test_row("two", 60, false),
        test_row("six", 7, true),
    ]
}

/// Temporary directory holding a database path
pub fn temp_database() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    (dir, path)
}

pub fn count_rows(database: &Path, table: &str) -> i64 {
    let conn = Connection::open(database).unwrap();
    conn.query_row(&format!("SELECT count(*) FROM \"{}\"", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
