//! Command-line argument definitions for the fixed-width loader
//!
//! This module defines the CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the fixed-width loader
///
/// Loads fixed-width drop files into a database table per file type, guided
/// by CSV column specifications, and routes each file to an archive or
/// failure directory.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fixed-width-loader",
    version,
    about = "Load fixed-width data files into a database using CSV column specifications",
    long_about = "Loads fixed-width text drop files named <file_type>_<drop_date>.<ext> from a data \
                  directory. Each file is parsed against <specs_dir>/<file_type>.csv, its rows are \
                  inserted into a table named after the file type, and the file is moved to the \
                  archive directory when every row was stored or to the failure directory otherwise."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load data files into the configured backend and route them
    Load(LoadArgs),
    /// Parse data files without loading or moving them
    Check(CheckArgs),
}

/// Which data files to process
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct FileSelection {
    /// Data file names inside the data directory (repeatable)
    ///
    /// When omitted, every regular file in the data directory is processed
    /// in name order.
    #[arg(
        short = 'f',
        long = "file",
        value_name = "NAME",
        help = "Data file name to process (repeatable)"
    )]
    pub files: Vec<String>,

    /// Process every file in the data directory
    #[arg(
        short = 'a',
        long = "all",
        conflicts_with = "files",
        help = "Process every file in the data directory"
    )]
    pub all: bool,
}

/// Settings shared by every command
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Directory holding data files awaiting load
    #[arg(long = "data-dir", value_name = "PATH", help = "Directory holding data files")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding `<file_type>.csv` column specifications
    #[arg(
        long = "specs-dir",
        value_name = "PATH",
        help = "Directory holding column specifications"
    )]
    pub specs_dir: Option<PathBuf>,

    #[arg(
        long = "archive-dir",
        value_name = "PATH",
        help = "Destination for successfully loaded files"
    )]
    pub archive_dir: Option<PathBuf>,

    #[arg(
        long = "failed-dir",
        value_name = "PATH",
        help = "Destination for files that failed to load"
    )]
    pub failed_dir: Option<PathBuf>,

    /// Storage backend key
    #[arg(long = "backend", value_name = "KEY", help = "Storage backend (sqlite)")]
    pub backend: Option<String>,

    /// Parser key
    #[arg(
        long = "file-type",
        value_name = "KEY",
        help = "Data file parser (fixed_width)"
    )]
    pub file_type: Option<String>,

    /// Database file for the SQLite backend
    #[arg(long = "database", value_name = "PATH", help = "Database file")]
    pub database: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config_dir>/fixed-width-loader/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Also write log output to this file
    #[arg(long = "log-file", value_name = "FILE", help = "Write logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the load command
#[derive(Debug, Clone, Default, Parser)]
pub struct LoadArgs {
    #[command(flatten)]
    pub selection: FileSelection,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the check command
#[derive(Debug, Clone, Default, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub selection: FileSelection,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl FileSelection {
    /// Explicitly named files, or `None` when the whole data directory is selected
    pub fn named_files(&self) -> Option<&[String]> {
        if self.all || self.files.is_empty() {
            None
        } else {
            Some(self.files.as_slice())
        }
    }

    pub fn validate(&self) -> Result<()> {
        for file in &self.files {
            if file.trim().is_empty() {
                return Err(Error::configuration("File name cannot be empty"));
            }
            if file.contains('/') || file.contains('\\') {
                return Err(Error::configuration(format!(
                    "File name must not contain a path: {}",
                    file
                )));
            }
        }
        Ok(())
    }
}

impl CommonArgs {
    /// Validate the shared arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        for (flag, value) in [("--backend", &self.backend), ("--file-type", &self.file_type)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::configuration(format!("{} cannot be empty", flag)));
            }
        }

        Ok(())
    }

    /// Determine the log level from verbosity flags, falling back to `configured`
    pub fn get_log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => configured,
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl LoadArgs {
    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        self.common.validate()
    }
}

impl CheckArgs {
    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        self.common.validate()
    }
}
