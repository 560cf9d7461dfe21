//! Data file orchestration
//!
//! Drives each named data file from the data directory through schema
//! resolution, parsing and persistence, then moves it into the archive
//! directory (every parsed row persisted) or the failure directory.
//!
//! ## Module Organization
//!
//! - [`handler`] - Directory contract, registry lookup and per-file routing
//! - [`loader`] - Parse-then-persist for one file against one parser and backend
//! - [`report`] - Per-file reports and run summaries
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fixed_width_loader::{Config, FileHandler};
//!
//! # fn example() -> fixed_width_loader::Result<()> {
//! let config = Config::default();
//! let handler = FileHandler::new(&config)?;
//! let summary = handler.run(&["orders_2016-10-13.txt"])?;
//! println!("{} archived, {} failed", summary.archived_count(), summary.failed_count());
//! # Ok(())
//! # }
//! ```

pub mod handler;
pub mod loader;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use handler::{FileHandler, ParserCache};
pub use loader::{LoadCounts, load_file, parse_file};
pub use report::{CheckReport, FileReport, LoadSummary};
