//! SQLite backend
//!
//! A connection is opened for each `init` and `insert_rows` call and closed
//! when the call returns, on success and on error alike.

use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, ToSql, params, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Backend;
use crate::app::models::{ColumnSpec, DataType, Row, Value};
use crate::constants::ID_COLUMN;
use crate::{Error, Result};

/// Table layout recorded by `init`
#[derive(Debug, Clone)]
struct TableDefinition {
    name: String,
    columns: Vec<ColumnSpec>,
}

/// Backend persisting rows into a SQLite database file
#[derive(Debug)]
pub struct SqliteBackend {
    database: PathBuf,
    table: Option<TableDefinition>,
}

impl SqliteBackend {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            table: None,
        }
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.database).map_err(|e| {
            Error::persistence(
                format!(
                    "Failed to open database {}: {}",
                    self.database.display(),
                    e
                ),
                Some(e),
            )
        })
    }

    /// Check whether `table_name` exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let conn = self.connect()?;
        table_exists(&conn, table_name)
    }
}

impl Backend for SqliteBackend {
    fn init(&mut self, table_name: &str, columns: &[ColumnSpec]) -> Result<bool> {
        info!("Initializing backend for table: {}", table_name);
        let conn = self.connect()?;

        if !table_exists(&conn, table_name)? {
            info!("Table `{}` does not exist yet; creating now", table_name);
            conn.execute_batch(&create_table_sql(table_name, columns))
                .map_err(|e| {
                    Error::persistence(
                        format!("Failed to create table '{}': {}", table_name, e),
                        Some(e),
                    )
                })?;
            info!("Table `{}` created", table_name);
        }

        self.table = Some(TableDefinition {
            name: table_name.to_string(),
            columns: columns.to_vec(),
        });

        Ok(true)
    }

    fn insert_rows(&mut self, rows: &[Row]) -> Result<usize> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| Error::persistence("Backend has not been initialized", None))?;

        // Validate every row before touching the database
        let ordered = rows
            .iter()
            .enumerate()
            .map(|(index, row)| ordered_values(table, index, row))
            .collect::<Result<Vec<_>>>()?;

        if ordered.is_empty() {
            debug!("No rows to insert into {}", table.name);
            return Ok(0);
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&insert_sql(&table.name, &table.columns)).map_err(|e| {
                Error::persistence(
                    format!("Failed to prepare insert into '{}': {}", table.name, e),
                    Some(e),
                )
            })?;

            for values in &ordered {
                inserted += stmt.execute(params_from_iter(values.iter()))?;
            }
        }

        tx.commit()?;
        debug!("Inserted {} rows into {}", inserted, table.name);

        Ok(inserted)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Boolean(b) => ToSqlOutput::from(*b),
        })
    }
}

/// Storage type for a schema column
pub fn sql_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Text => "TEXT",
        DataType::Integer => "INTEGER",
        DataType::Boolean => "BOOLEAN",
    }
}

/// Quote an identifier for use in SQL, doubling embedded quotes
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn create_table_sql(table_name: &str, columns: &[ColumnSpec]) -> String {
    let mut definitions = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_identifier(ID_COLUMN)
    )];
    definitions.extend(
        columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), sql_type(c.data_type))),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table_name),
        definitions.join(", ")
    )
}

fn insert_sql(table_name: &str, columns: &[ColumnSpec]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_identifier(&c.name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table_name),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Values of `row` in table column order
///
/// The row must have exactly the table's columns, each holding a value of the
/// column's declared type.
fn ordered_values<'a>(table: &TableDefinition, index: usize, row: &'a Row) -> Result<Vec<&'a Value>> {
    if row.len() != table.columns.len() {
        return Err(Error::persistence(
            format!(
                "Row {} has {} fields but table '{}' has {} columns",
                index,
                row.len(),
                table.name,
                table.columns.len()
            ),
            None,
        ));
    }

    table
        .columns
        .iter()
        .map(|column| {
            let value = row.get(&column.name).ok_or_else(|| {
                Error::persistence(
                    format!(
                        "Row {} has no value for column '{}' of table '{}'",
                        index, column.name, table.name
                    ),
                    None,
                )
            })?;

            if value.data_type() != column.data_type {
                return Err(Error::persistence(
                    format!(
                        "Row {} column '{}' holds {} but table '{}' expects {}",
                        index,
                        column.name,
                        value.data_type(),
                        table.name,
                        column.data_type
                    ),
                    None,
                ));
            }

            Ok(value)
        })
        .collect()
}
