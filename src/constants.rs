//! Application constants for the fixed-width loader
//!
//! This module contains default locations, registry keys and the schema
//! resource conventions shared by the parser, orchestrator and CLI.

// =============================================================================
// Schema Resource Format
// =============================================================================

/// Header of the schema column holding the column name
pub const SCHEMA_COLUMN_NAME: &str = "column name";

/// Header of the schema column holding the fixed width
pub const SCHEMA_WIDTH: &str = "width";

/// Header of the schema column holding the declared data type
pub const SCHEMA_DATA_TYPE: &str = "datatype";

/// Extension of schema resources inside the specs directory
pub const SCHEMA_FILE_EXTENSION: &str = "csv";

// =============================================================================
// Data File Naming
// =============================================================================

/// Separator between the file type and the drop date in a data file name
pub const FILE_NAME_SEPARATOR: char = '_';

// =============================================================================
// Registry Keys
// =============================================================================

/// Parser key for fixed-width files
pub const FIXED_WIDTH: &str = "fixed_width";

/// Backend key for the SQLite store
pub const SQLITE: &str = "sqlite";

// =============================================================================
// Default Locations
// =============================================================================

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_SPECS_DIR: &str = "./specs";
pub const DEFAULT_ARCHIVE_DIR: &str = "./data/loaded";
pub const DEFAULT_FAILED_DIR: &str = "./data/failed";

/// Default SQLite database file, relative to the working directory
pub const DEFAULT_DATABASE_FILE: &str = "file_load.db";

/// Name of the primary key column prepended to every created table
pub const ID_COLUMN: &str = "id";

// =============================================================================
// Configuration
// =============================================================================

/// Directory under the user config dir that holds `config.toml`
pub const CONFIG_DIR_NAME: &str = "fixed-width-loader";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "FWL_";

/// Default log level when no verbosity flag is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";
