//! Shared utilities and helpers for CLI commands
//!
//! Logging setup, layered configuration loading, data file discovery and
//! progress bars used by both the load and check commands.

use crate::cli::args::{CommonArgs, FileSelection};
use crate::config::{Config, LoggingConfig};
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info, warn};

/// Set up structured logging
///
/// `RUST_LOG` wins over the level derived from flags and configuration. When
/// a log file is configured, events are also written to it without ANSI
/// colours.
pub fn setup_logging(args: &CommonArgs, logging: &LoggingConfig) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level(&logging.level);

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fixed_width_loader={}", log_level)));

    let file_layer = match &logging.file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir).map_err(|e| {
                Error::io(format!("Failed to create log directory {}", dir.display()), e)
            })?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&dir)
                .map_err(|e| {
                    Error::configuration(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(appender),
            )
        }
        None => None,
    };

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Split a log file path into its directory and file name
fn split_log_path(path: &Path) -> Result<(std::path::PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            Error::configuration(format!("Invalid log file path: {}", path.display()))
        })?
        .to_string();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };

    Ok((dir, file_name))
}

/// Load configuration using layered approach (defaults -> file -> env -> args)
pub fn load_configuration(args: &CommonArgs) -> Result<Config> {
    let mut config = Config::load_layered(args.config_file.as_deref())?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &CommonArgs) {
    if let Some(data_dir) = &args.data_dir {
        config.paths.data_dir = data_dir.clone();
    }
    if let Some(specs_dir) = &args.specs_dir {
        config.paths.specs_dir = specs_dir.clone();
    }
    if let Some(archive_dir) = &args.archive_dir {
        config.paths.archive_dir = archive_dir.clone();
    }
    if let Some(failed_dir) = &args.failed_dir {
        config.paths.failed_dir = failed_dir.clone();
    }
    if let Some(backend) = &args.backend {
        config.backend.kind = backend.clone();
    }
    if let Some(database) = &args.database {
        config.backend.database = database.clone();
    }
    if let Some(file_type) = &args.file_type {
        config.parser.file_type = file_type.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.logging.file = Some(log_file.clone());
    }
}

/// Create the archive and failure directories
pub fn prepare_directories(config: &Config) -> Result<()> {
    info!("Preparing output directories");
    config.ensure_output_directories()?;
    info!(
        "Archive: {}, failed: {}",
        config.paths.archive_dir.display(),
        config.paths.failed_dir.display()
    );
    Ok(())
}

/// Names of the regular files directly inside `data_dir`, sorted
///
/// Sub-directories (including archive and failure directories nested in the
/// data directory) are skipped.
pub fn discover_data_files(data_dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        Error::io(
            format!("Failed to read data directory {}", data_dir.display()),
            e,
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| Error::io("Failed to read data directory entry", e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(name) => warn!("Skipping file with non UTF-8 name: {:?}", name),
        }
    }

    // Sort files for consistent processing order
    files.sort();

    debug!(
        "Discovered {} data files in {}",
        files.len(),
        data_dir.display()
    );
    for file in &files {
        debug!("  Found: {}", file);
    }

    Ok(files)
}

/// Files named on the command line, or every file in the data directory
pub fn select_files(selection: &FileSelection, config: &Config) -> Result<Vec<String>> {
    match selection.named_files() {
        Some(files) => Ok(files.to_vec()),
        None => discover_data_files(&config.paths.data_dir),
    }
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} ETA: {eta}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
