//! Configuration management and validation.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! config file, `FWL_*` environment variables and CLI flags (applied by the
//! command layer).

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ARCHIVE_DIR, DEFAULT_DATA_DIR,
    DEFAULT_DATABASE_FILE, DEFAULT_FAILED_DIR, DEFAULT_LOG_LEVEL, DEFAULT_SPECS_DIR, ENV_PREFIX,
    FIXED_WIDTH, SQLITE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration for the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub backend: BackendConfig,
    pub parser: ParserConfig,
    pub logging: LoggingConfig,
}

/// The four directories a load run works with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding data files awaiting load
    pub data_dir: PathBuf,

    /// Directory holding `<file_type>.csv` schema resources
    pub specs_dir: PathBuf,

    /// Destination for successfully loaded files
    pub archive_dir: PathBuf,

    /// Destination for files that failed to load
    pub failed_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            specs_dir: PathBuf::from(DEFAULT_SPECS_DIR),
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            failed_dir: PathBuf::from(DEFAULT_FAILED_DIR),
        }
    }
}

/// Storage backend selection and settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Registry key of the backend
    pub kind: String,

    /// Database file for file-based backends
    pub database: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: SQLITE.to_string(),
            database: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }
}

/// Parser selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Registry key of the parser used for every data file
    pub file_type: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            file_type: FIXED_WIDTH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when neither `RUST_LOG` nor a verbosity flag is given
    pub level: String,

    /// Optional log file written alongside stderr output
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Configuration with every directory and the database under `root`
    ///
    /// Mirrors the default layout: `data/`, `specs/`, `data/loaded/`,
    /// `data/failed/` and `file_load.db`.
    pub fn with_root(root: &Path) -> Self {
        let data_dir = root.join("data");
        Self {
            paths: PathsConfig {
                archive_dir: data_dir.join("loaded"),
                failed_dir: data_dir.join("failed"),
                data_dir,
                specs_dir: root.join("specs"),
            },
            backend: BackendConfig {
                database: root.join(DEFAULT_DATABASE_FILE),
                ..BackendConfig::default()
            },
            ..Self::default()
        }
    }

    /// Default location of the user config file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    /// Defaults, then the config file, then environment overrides
    ///
    /// An explicit `config_file` must exist. The default config path is used
    /// only when present.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found(path.display().to_string()));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `FWL_*` overrides looked up through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|value| !value.is_empty())
        };

        if let Some(value) = var("DATA_DIR") {
            self.paths.data_dir = PathBuf::from(value);
        }
        if let Some(value) = var("SPECS_DIR") {
            self.paths.specs_dir = PathBuf::from(value);
        }
        if let Some(value) = var("ARCHIVE_DIR") {
            self.paths.archive_dir = PathBuf::from(value);
        }
        if let Some(value) = var("FAILED_DIR") {
            self.paths.failed_dir = PathBuf::from(value);
        }
        if let Some(value) = var("BACKEND") {
            self.backend.kind = value;
        }
        if let Some(value) = var("DATABASE") {
            self.backend.database = PathBuf::from(value);
        }
        if let Some(value) = var("FILE_TYPE") {
            self.parser.file_type = value;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = var("LOG_FILE") {
            self.logging.file = Some(PathBuf::from(value));
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.paths.data_dir = data_dir.into();
        self
    }

    pub fn with_backend(mut self, kind: impl Into<String>) -> Self {
        self.backend.kind = kind.into();
        self
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.parser.file_type = file_type.into();
        self
    }

    /// Validate configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        require_dir("Data directory", &self.paths.data_dir)?;
        require_dir("Specs directory", &self.paths.specs_dir)?;

        if self.paths.archive_dir == self.paths.failed_dir {
            return Err(Error::configuration(format!(
                "Archive and failure directories must differ (both {})",
                self.paths.archive_dir.display()
            )));
        }

        for (label, dir) in [
            ("Archive", &self.paths.archive_dir),
            ("Failure", &self.paths.failed_dir),
        ] {
            if dir == &self.paths.data_dir {
                return Err(Error::configuration(format!(
                    "{} directory must differ from the data directory",
                    label
                )));
            }
        }

        if self.backend.kind.trim().is_empty() {
            return Err(Error::configuration("Backend key must not be empty"));
        }
        if self.parser.file_type.trim().is_empty() {
            return Err(Error::configuration("Parser key must not be empty"));
        }

        Ok(())
    }

    /// Create the archive and failure directories if missing
    pub fn ensure_output_directories(&self) -> Result<()> {
        for dir in [&self.paths.archive_dir, &self.paths.failed_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::io(format!("Failed to create directory {}", dir.display()), e)
            })?;
        }
        Ok(())
    }
}

fn require_dir(label: &str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::configuration(format!(
            "{} does not exist: {}",
            label,
            path.display()
        )));
    }
    Ok(())
}
