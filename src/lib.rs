//! Fixed-Width Loader Library
//!
//! A Rust library for loading fixed-width text drop files into a relational
//! store, guided by per-file-type schema specifications.
//!
//! This library provides tools for:
//! - Loading column specifications (name, width, type) from CSV schema files
//! - Parsing fixed-width lines into typed values with exact-width validation
//! - Building named rows and persisting them through pluggable backends
//! - Routing each processed file to an archive or failure directory

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod file_handler;
        pub mod fixed_width_parser;
        pub mod record_parser;
        pub mod registry;
        pub mod storage_backend;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ColumnSpec, DataFileName, DataType, LoadOutcome, Row, Value};
pub use app::services::file_handler::FileHandler;
pub use config::Config;

/// Result type alias for the loader
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema loading, parsing, persistence and file routing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Schema resource could not be read or is invalid
    #[error("Schema load error in '{path}': {message}")]
    SchemaLoad {
        path: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Declared column type has no parser or storage mapping
    #[error("Unsupported data type '{data_type}' for column '{column}'")]
    UnsupportedType { column: String, data_type: String },

    /// Line length does not match the schema's total width
    #[error(
        "Malformed line <{line}>: length {length} does not match expected width {expected} (widths {widths:?})"
    )]
    MalformedLine {
        line: String,
        length: usize,
        expected: usize,
        widths: Vec<usize>,
    },

    /// Field slice could not be converted to the declared type
    #[error(
        "Cannot convert '{value}' to {data_type} for column '{column}' (field {index} at offset {offset})"
    )]
    ValueConversion {
        column: String,
        index: usize,
        offset: usize,
        data_type: String,
        value: String,
    },

    /// Field names and values differ in length
    #[error("Row shape mismatch: {names} field names but {values} values")]
    RowShape { names: usize, values: usize },

    /// Storage backend failed to initialise or persist rows
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Data file name does not follow `<file_type>_<drop_date>.<ext>`
    #[error("File name '{file_name}' does not conform to expected format <file_type>_<drop_date>.<ext>")]
    InvalidFileName { file_name: String },

    /// No schema resource exists for the file's type
    #[error("No specification file found for '{file_name}' (looked for {spec_path})")]
    MissingSpecification { file_name: String, spec_path: String },

    /// Backend key is not registered
    #[error("Backend '{backend}' is not supported. Choose from supported backends: {available}")]
    UnsupportedBackend { backend: String, available: String },

    /// File type key is not registered
    #[error("File type '{file_type}' is not supported. Choose from supported file types: {available}")]
    UnsupportedFileType { file_type: String, available: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a schema load error
    pub fn schema_load(
        path: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::SchemaLoad {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an unsupported data type error
    pub fn unsupported_type(column: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            column: column.into(),
            data_type: data_type.into(),
        }
    }

    /// Create a malformed line error
    pub fn malformed_line(line: impl Into<String>, length: usize, widths: &[usize]) -> Self {
        Self::MalformedLine {
            line: line.into(),
            length,
            expected: widths.iter().sum(),
            widths: widths.to_vec(),
        }
    }

    /// Create a value conversion error
    pub fn value_conversion(
        column: impl Into<String>,
        index: usize,
        offset: usize,
        data_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::ValueConversion {
            column: column.into(),
            index,
            offset,
            data_type: data_type.into(),
            value: value.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>, source: Option<rusqlite::Error>) -> Self {
        Self::Persistence {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid file name error
    pub fn invalid_file_name(file_name: impl Into<String>) -> Self {
        Self::InvalidFileName {
            file_name: file_name.into(),
        }
    }

    /// Create a missing specification error
    pub fn missing_specification(
        file_name: impl Into<String>,
        spec_path: impl Into<String>,
    ) -> Self {
        Self::MissingSpecification {
            file_name: file_name.into(),
            spec_path: spec_path.into(),
        }
    }

    /// Create an unsupported backend error
    pub fn unsupported_backend(backend: impl Into<String>, available: &[&str]) -> Self {
        Self::UnsupportedBackend {
            backend: backend.into(),
            available: available.join(", "),
        }
    }

    /// Create an unsupported file type error
    pub fn unsupported_file_type(file_type: impl Into<String>, available: &[&str]) -> Self {
        Self::UnsupportedFileType {
            file_type: file_type.into(),
            available: available.join(", "),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Errors that must halt a batch instead of routing a single file
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::UnsupportedBackend { .. }
                | Error::UnsupportedFileType { .. }
                | Error::FileNotFound { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::SchemaLoad {
            path: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Persistence {
            message: error.to_string(),
            source: Some(error),
        }
    }
}
