//! Fixed-width parser for drop files described by CSV schema resources
//!
//! ## Architecture
//!
//! - [`schema`] - Schema resource loading (`column name`, `width`, `datatype`)
//! - [`parser`] - Width validation and positional slicing of a line
//! - [`field_parsers`] - Per-type conversion of a single field slice
//! - [`row_builder`] - Pairing parsed values with column names
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fixed_width_loader::app::services::fixed_width_parser::FixedWidthParser;
//! use fixed_width_loader::app::services::record_parser::RecordParser;
//!
//! # fn example() -> fixed_width_loader::Result<()> {
//! let parser = FixedWidthParser::from_path(std::path::Path::new("specs/testformat.csv"))?;
//! let row = parser.parse_row("Foonyor   1  0")?;
//! println!("{} -> {:?}", parser.table_name(), row);
//! # Ok(())
//! # }
//! ```

pub mod field_parsers;
pub mod parser;
pub mod row_builder;
pub mod schema;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::FixedWidthParser;
pub use row_builder::build_row;
pub use schema::SchemaDefinition;
