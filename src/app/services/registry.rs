//! Parser and backend registries
//!
//! Each registry maps a symbolic key to a factory. The orchestrator looks up
//! its parser and backend once at construction and calls the factories per
//! schema resource and per data file respectively.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::Result;
use crate::app::services::fixed_width_parser::FixedWidthParser;
use crate::app::services::record_parser::RecordParser;
use crate::app::services::storage_backend::{Backend, SqliteBackend};
use crate::config::BackendConfig;
use crate::constants::{FIXED_WIDTH, SQLITE};

/// Builds a parser from the schema resource at the given path
pub type ParserFactory = Arc<dyn Fn(&Path) -> Result<Box<dyn RecordParser>> + Send + Sync>;

/// Builds a backend from the backend configuration
pub type BackendFactory = Arc<dyn Fn(&BackendConfig) -> Result<Box<dyn Backend>> + Send + Sync>;

/// String-keyed map of factories
#[derive(Clone)]
pub struct Registry<F> {
    entries: BTreeMap<String, F>,
}

pub type ParserRegistry = Registry<ParserFactory>;
pub type BackendRegistry = Registry<BackendFactory>;

impl<F: Clone> Registry<F> {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `factory` under `key`, replacing any previous entry
    pub fn register(&mut self, key: impl Into<String>, factory: F) -> &mut Self {
        self.entries.insert(key.into(), factory);
        self
    }

    pub fn get(&self, key: &str) -> Option<F> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl<F: Clone> Default for Registry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ParserRegistry {
    /// Registry with the built-in parsers (`fixed_width`)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            FIXED_WIDTH,
            Arc::new(|path: &Path| -> Result<Box<dyn RecordParser>> {
                Ok(Box::new(FixedWidthParser::from_path(path)?))
            }) as ParserFactory,
        );
        registry
    }
}

impl BackendRegistry {
    /// Registry with the built-in backends (`sqlite`)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            SQLITE,
            Arc::new(|config: &BackendConfig| -> Result<Box<dyn Backend>> {
                Ok(Box::new(SqliteBackend::new(&config.database)))
            }) as BackendFactory,
        );
        registry
    }
}
