//! Schema resource loading
//!
//! A schema resource is a CSV file with the headers `column name`, `width`
//! and `datatype`. Record order is column order, both for slicing data lines
//! and for the columns of the destination table.

use crate::app::models::{ColumnSpec, DataType};
use crate::constants::{ID_COLUMN, SCHEMA_COLUMN_NAME, SCHEMA_DATA_TYPE, SCHEMA_WIDTH};
use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column layout for one file type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDefinition {
    source: String,
    table_name: String,
    columns: Vec<ColumnSpec>,
    total_width: usize,
}

/// Positions of the required headers within the schema resource
struct HeaderIndex {
    name: usize,
    width: usize,
    data_type: usize,
}

impl HeaderIndex {
    fn locate(source: &str, headers: &StringRecord) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h == wanted)
                .ok_or_else(|| {
                    Error::schema_load(
                        source,
                        format!("Missing required header '{}'", wanted),
                        None,
                    )
                })
        };

        Ok(Self {
            name: find(SCHEMA_COLUMN_NAME)?,
            width: find(SCHEMA_WIDTH)?,
            data_type: find(SCHEMA_DATA_TYPE)?,
        })
    }
}

impl SchemaDefinition {
    /// Load a schema resource from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::schema_load(&source, "Failed to open schema file", Some(e)))?;

        Self::from_csv(&source, reader)
    }

    /// Load a schema resource from any reader
    ///
    /// `source` identifies the resource; its base name becomes the table name.
    pub fn from_reader<R: Read>(source: &str, reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        Self::from_csv(source, reader)
    }

    /// Build a schema from already-known columns
    pub fn from_columns(source: &str, columns: Vec<ColumnSpec>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::schema_load(source, "Schema defines no columns", None));
        }

        // Table column names compare case-insensitively in SQL
        let mut seen = HashSet::new();
        let mut total_width: usize = 0;
        for column in &columns {
            if column.name.is_empty() {
                return Err(Error::schema_load(source, "Column name must not be empty", None));
            }
            if column.width == 0 {
                return Err(Error::schema_load(
                    source,
                    format!("Width for column '{}' must be a positive integer", column.name),
                    None,
                ));
            }
            if column.name.eq_ignore_ascii_case(ID_COLUMN) {
                return Err(Error::schema_load(
                    source,
                    format!("Column name '{}' is reserved for the row id", column.name),
                    None,
                ));
            }
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(Error::schema_load(
                    source,
                    format!("Duplicate column name '{}'", column.name),
                    None,
                ));
            }
            total_width = total_width
                .checked_add(column.width)
                .ok_or_else(|| Error::schema_load(source, "Total width overflows", None))?;
        }

        let table_name = table_name_for(source);

        debug!(
            "Loaded schema {}: {} columns, total width {}",
            source,
            columns.len(),
            total_width
        );

        Ok(Self {
            source: source.to_string(),
            table_name,
            columns,
            total_width,
        })
    }

    fn from_csv<R: Read>(source: &str, mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader
            .headers()
            .map_err(|e| Error::schema_load(source, "Failed to read schema headers", Some(e)))?
            .clone();
        let index = HeaderIndex::locate(source, &headers)?;

        let mut columns = Vec::new();
        for (record_number, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                Error::schema_load(
                    source,
                    format!("Failed to read schema record {}", record_number + 1),
                    Some(e),
                )
            })?;

            let name = record.get(index.name).unwrap_or_default();
            let raw_width = record.get(index.width).unwrap_or_default();
            let raw_type = record.get(index.data_type).unwrap_or_default();

            let width = raw_width.parse::<usize>().map_err(|_| {
                Error::schema_load(
                    source,
                    format!(
                        "Width '{}' for column '{}' must be a positive integer",
                        raw_width, name
                    ),
                    None,
                )
            })?;

            let data_type = DataType::from_declared(name, raw_type)?;
            columns.push(ColumnSpec::new(name, width, data_type));
        }

        Self::from_columns(source, columns)
    }

    /// Identifier of the resource this schema was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Base name of the schema resource, without path or extension
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Sum of all column widths
    pub fn total_width(&self) -> usize {
        self.total_width
    }

    pub fn widths(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.width).collect()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Strip any directories and the extension, keeping the base name verbatim
fn table_name_for(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}
