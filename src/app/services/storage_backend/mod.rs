//! Storage backends for parsed rows
//!
//! The orchestrator depends only on the [`Backend`] trait: a backend is
//! initialised for one table and column layout, then receives each file's
//! rows as a single batch and reports how many it persisted.
//!
//! - [`sqlite`] - SQLite backend (one connection per call, one transaction per batch)

pub mod sqlite;

#[cfg(test)]
pub mod tests;

pub use sqlite::SqliteBackend;

use crate::Result;
use crate::app::models::{ColumnSpec, Row};

/// Destination for parsed rows
pub trait Backend: std::fmt::Debug {
    /// Ensure a table matching `columns` exists, creating it if absent
    ///
    /// Created tables get an auto-increment `id` primary key before the schema
    /// columns. An existing table is left as it is.
    fn init(&mut self, table_name: &str, columns: &[ColumnSpec]) -> Result<bool>;

    /// Persist `rows` as one batch and return the number of rows persisted
    ///
    /// A row whose keys do not match the initialised columns fails the whole
    /// batch; nothing from the batch is kept.
    fn insert_rows(&mut self, rows: &[Row]) -> Result<usize>;
}
