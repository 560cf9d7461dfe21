//! Parse-then-persist for a single data file

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info};

use crate::app::models::Row;
use crate::app::services::record_parser::RecordParser;
use crate::app::services::storage_backend::Backend;
use crate::{Error, Result};

/// Rows produced by the parser and rows accepted by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounts {
    pub parsed: usize,
    pub inserted: usize,
}

impl LoadCounts {
    /// Every parsed row was persisted
    pub fn is_complete(&self) -> bool {
        self.parsed == self.inserted
    }
}

/// Parse every line of `path` into rows
///
/// Stops at the first line that fails to parse; no partial result is
/// returned.
pub fn parse_file(parser: &dyn RecordParser, path: &Path) -> Result<Vec<Row>> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("Failed to open data file {}", path.display()), e))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            Error::io(
                format!("Failed to read line {} of {}", line_number + 1, path.display()),
                e,
            )
        })?;

        let row = parser.parse_row(&line).inspect_err(|e| {
            error!("{}:{}: {}", path.display(), line_number + 1, e);
        })?;
        rows.push(row);
    }

    debug!("Parsed {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Initialise `backend` for the parser's table, parse `path` and persist
/// the rows as one batch
pub fn load_file(
    parser: &dyn RecordParser,
    backend: &mut dyn Backend,
    path: &Path,
) -> Result<LoadCounts> {
    backend.init(parser.table_name(), parser.columns())?;

    let rows = parse_file(parser, path)?;
    let inserted = backend.insert_rows(&rows)?;

    info!(
        "Inserted {} of {} rows from {} into {}",
        inserted,
        rows.len(),
        path.display(),
        parser.table_name()
    );

    Ok(LoadCounts {
        parsed: rows.len(),
        inserted,
    })
}
