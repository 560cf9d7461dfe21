//! Per-file orchestration and routing
//!
//! Each data file moves through the states
//! `named -> schema resolved -> schema loaded -> backend ready -> parsed ->
//! persisted` and ends either archived or failed. Any error before the final
//! move routes the file to the failure directory; only a missing data file or
//! a failed move halts the batch.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::loader::{LoadCounts, load_file, parse_file};
use super::report::{CheckReport, FileReport, LoadSummary};
use crate::app::models::{DataFileName, LoadOutcome};
use crate::app::services::record_parser::RecordParser;
use crate::app::services::registry::{
    BackendFactory, BackendRegistry, ParserFactory, ParserRegistry,
};
use crate::config::{BackendConfig, Config, PathsConfig};
use crate::constants::SCHEMA_FILE_EXTENSION;
use crate::{Error, Result};

/// Parsers loaded during one run, keyed by file type
#[derive(Debug, Default)]
pub struct ParserCache {
    parsers: HashMap<String, Arc<dyn RecordParser>>,
}

impl ParserCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Cached parser for `file_type`, loading it on first use
    ///
    /// Failed loads are not cached.
    fn get_or_load<F>(&mut self, file_type: &str, load: F) -> Result<Arc<dyn RecordParser>>
    where
        F: FnOnce() -> Result<Box<dyn RecordParser>>,
    {
        if let Some(parser) = self.parsers.get(file_type) {
            debug!("Using cached schema for {}", file_type);
            return Ok(Arc::clone(parser));
        }

        let parser: Arc<dyn RecordParser> = Arc::from(load()?);
        self.parsers.insert(file_type.to_string(), Arc::clone(&parser));
        Ok(parser)
    }
}

/// Routes data files through parsing and persistence
pub struct FileHandler {
    paths: PathsConfig,
    backend_config: BackendConfig,
    file_type: String,
    parser_factory: ParserFactory,
    backend_factory: BackendFactory,
}

impl fmt::Debug for FileHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandler")
            .field("paths", &self.paths)
            .field("backend", &self.backend_config.kind)
            .field("file_type", &self.file_type)
            .finish()
    }
}

impl FileHandler {
    /// Create a handler using the built-in parsers and backends
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_registries(
            config,
            &ParserRegistry::with_defaults(),
            &BackendRegistry::with_defaults(),
        )
    }

    /// Create a handler resolving keys against the given registries
    ///
    /// Unknown backend or parser keys fail here, before any file is touched.
    pub fn with_registries(
        config: &Config,
        parsers: &ParserRegistry,
        backends: &BackendRegistry,
    ) -> Result<Self> {
        let backend_factory = backends.get(&config.backend.kind).ok_or_else(|| {
            error!("Backend type `{}` is not supported", config.backend.kind);
            Error::unsupported_backend(&config.backend.kind, &backends.keys())
        })?;

        let parser_factory = parsers.get(&config.parser.file_type).ok_or_else(|| {
            error!("File type `{}` is not supported", config.parser.file_type);
            Error::unsupported_file_type(&config.parser.file_type, &parsers.keys())
        })?;

        debug!(
            "File handler ready: backend={}, file_type={}",
            config.backend.kind, config.parser.file_type
        );

        Ok(Self {
            paths: config.paths.clone(),
            backend_config: config.backend.clone(),
            file_type: config.parser.file_type.clone(),
            parser_factory,
            backend_factory,
        })
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    /// Resolve the schema resource for a data file name
    ///
    /// `<file_type>_<drop_date>.<ext>` maps to `<specs_dir>/<file_type>.csv`,
    /// which must exist.
    pub fn spec_path(&self, file_name: &str) -> Result<PathBuf> {
        let name = DataFileName::parse(file_name)?;
        let spec_path = self
            .paths
            .specs_dir
            .join(format!("{}.{}", name.file_type, SCHEMA_FILE_EXTENSION));

        if !spec_path.is_file() {
            return Err(Error::missing_specification(
                file_name,
                spec_path.display().to_string(),
            ));
        }

        debug!(
            "Resolved {} (type {}, dropped {}) to {}",
            file_name,
            name.file_type,
            name.drop_date,
            spec_path.display()
        );
        Ok(spec_path)
    }

    /// Process `files` in order
    pub fn run<S: AsRef<str>>(&self, files: &[S]) -> Result<LoadSummary> {
        self.run_with(files, |_| {})
    }

    /// Process `files` in order, calling `on_file` after each one is routed
    ///
    /// Stops at the first batch-halting error; files after it stay in the
    /// data directory.
    pub fn run_with<S, F>(&self, files: &[S], mut on_file: F) -> Result<LoadSummary>
    where
        S: AsRef<str>,
        F: FnMut(&FileReport),
    {
        info!("Processing {} files", files.len());
        let start = Instant::now();
        let mut summary = LoadSummary::new();
        let mut cache = ParserCache::new();

        for file_name in files {
            let report = self.process_file(file_name.as_ref(), &mut cache)?;
            on_file(&report);
            summary.push(report);
        }

        summary.processing_time = start.elapsed();
        info!(
            "Processed {} files: {} archived, {} failed",
            summary.files.len(),
            summary.archived_count(),
            summary.failed_count()
        );

        Ok(summary)
    }

    /// Load one data file and move it to the archive or failure directory
    pub fn process_file(&self, file_name: &str, cache: &mut ParserCache) -> Result<FileReport> {
        let data_path = self.data_path(file_name)?;
        info!("Processing {}", file_name);

        let (counts, error) = match self.load(file_name, &data_path, cache) {
            Ok(counts) if counts.is_complete() => (counts, None),
            Ok(counts) => {
                warn!(
                    "{}: backend persisted {} of {} rows",
                    file_name, counts.inserted, counts.parsed
                );
                let message = format!(
                    "Row count mismatch: parsed {}, inserted {}",
                    counts.parsed, counts.inserted
                );
                (counts, Some(message))
            }
            Err(e) if e.is_critical() => {
                error!("Halting batch at {}: {}", file_name, e);
                return Err(e);
            }
            Err(e) => {
                error!("Failed to load {}: {}", file_name, e);
                (LoadCounts::default(), Some(e.to_string()))
            }
        };

        let outcome = LoadOutcome::from_success(error.is_none());
        let destination = self.move_file(&data_path, outcome.is_success())?;

        Ok(FileReport {
            file_name: file_name.to_string(),
            outcome,
            rows_parsed: counts.parsed,
            rows_inserted: counts.inserted,
            destination,
            error,
        })
    }

    fn load(&self, file_name: &str, data_path: &Path, cache: &mut ParserCache) -> Result<LoadCounts> {
        let parser = self.parser_for(file_name, cache)?;
        let mut backend = (self.backend_factory)(&self.backend_config)?;
        load_file(parser.as_ref(), backend.as_mut(), data_path)
    }

    fn parser_for(&self, file_name: &str, cache: &mut ParserCache) -> Result<Arc<dyn RecordParser>> {
        let name = DataFileName::parse(file_name)?;
        cache.get_or_load(&name.file_type, || {
            let spec_path = self.spec_path(file_name)?;
            (self.parser_factory)(&spec_path)
        })
    }

    /// Parse every named file without touching the backend or moving files
    pub fn check<S: AsRef<str>>(&self, files: &[S]) -> Result<Vec<CheckReport>> {
        let mut cache = ParserCache::new();
        files
            .iter()
            .map(|file_name| self.check_file(file_name.as_ref(), &mut cache))
            .collect()
    }

    /// Parse one data file and report its row count or first error
    pub fn check_file(&self, file_name: &str, cache: &mut ParserCache) -> Result<CheckReport> {
        let data_path = self.data_path(file_name)?;

        let parser = match self.parser_for(file_name, cache) {
            Ok(parser) => parser,
            Err(e) => {
                warn!("{}: {}", file_name, e);
                return Ok(CheckReport {
                    file_name: file_name.to_string(),
                    table_name: None,
                    rows: None,
                    error: Some(e.to_string()),
                });
            }
        };

        let (rows, error) = match parse_file(parser.as_ref(), &data_path) {
            Ok(rows) => (Some(rows.len()), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Ok(CheckReport {
            file_name: file_name.to_string(),
            table_name: Some(parser.table_name().to_string()),
            rows,
            error,
        })
    }

    fn data_path(&self, file_name: &str) -> Result<PathBuf> {
        let data_path = self.paths.data_dir.join(file_name);
        if !data_path.is_file() {
            error!("Data file {} does not exist", data_path.display());
            return Err(Error::file_not_found(data_path.display().to_string()));
        }
        Ok(data_path)
    }

    /// Move a processed file into the archive (`success`) or failure directory
    ///
    /// The file keeps its base name. An existing file at the target is
    /// replaced.
    pub fn move_file(&self, file_path: &Path, success: bool) -> Result<PathBuf> {
        let target_dir = if success {
            &self.paths.archive_dir
        } else {
            &self.paths.failed_dir
        };

        let file_name = file_path
            .file_name()
            .ok_or_else(|| Error::file_not_found(file_path.display().to_string()))?;
        let target = target_dir.join(file_name);

        if target.exists() {
            warn!("Replacing existing file {}", target.display());
        }

        std::fs::rename(file_path, &target).map_err(|e| {
            Error::io(
                format!(
                    "Failed to move {} to {}",
                    file_path.display(),
                    target.display()
                ),
                e,
            )
        })?;

        info!("Moved {} to {}", file_path.display(), target.display());
        Ok(target)
    }
}
