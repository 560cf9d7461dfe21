//! Test utilities and mock infrastructure for file orchestration testing
//!
//! Provides a temporary directory layout and a recording backend whose
//! behaviour can be chosen per test.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::app::models::{ColumnSpec, Row};
use crate::app::services::file_handler::FileHandler;
use crate::app::services::registry::{BackendFactory, BackendRegistry, ParserRegistry};
use crate::app::services::storage_backend::Backend;
use crate::config::{BackendConfig, Config};
use crate::{Error, Result};

// Test modules
mod handler_tests;

/// Schema with a text, a boolean and an integer column (total width 14)
pub const SPEC: &str = "column name,width,datatype\n\
name,10,TEXT\n\
valid,1,BOOLEAN\n\
count,3,INTEGER\n";

/// Two well-formed lines for [`SPEC`]
pub const GOOD_DATA: &str = "Foonyor   1  0\nBarzane   0-12\n";

/// Second line is one character short
pub const MALFORMED_DATA: &str = "Foonyor   1  0\nBarzane   0-1\n";

pub const MOCK_BACKEND: &str = "mock";

/// Temporary data/specs/archive/failure layout
pub struct TestEnv {
    pub temp: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config::with_root(temp.path());
        std::fs::create_dir_all(&config.paths.data_dir).unwrap();
        std::fs::create_dir_all(&config.paths.specs_dir).unwrap();
        config.ensure_output_directories().unwrap();
        Self { temp, config }
    }

    pub fn write_spec(&self, file_type: &str, content: &str) {
        let path = self.config.paths.specs_dir.join(format!("{}.csv", file_type));
        std::fs::write(path, content).unwrap();
    }

    pub fn write_data(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.config.paths.data_dir.join(file_name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn is_pending(&self, file_name: &str) -> bool {
        self.config.paths.data_dir.join(file_name).exists()
    }

    pub fn is_archived(&self, file_name: &str) -> bool {
        self.config.paths.archive_dir.join(file_name).exists()
    }

    pub fn is_failed(&self, file_name: &str) -> bool {
        self.config.paths.failed_dir.join(file_name).exists()
    }

    /// Exactly one of archived or failed, and no longer pending
    pub fn assert_routed_once(&self, file_name: &str) {
        assert!(!self.is_pending(file_name), "{} still pending", file_name);
        assert!(
            self.is_archived(file_name) ^ self.is_failed(file_name),
            "{} must be in exactly one of archive or failure",
            file_name
        );
    }
}

/// How the mock backend responds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Persist every row
    Accept,
    /// Report one row fewer than given
    ShortCount,
    FailInit,
    FailInsert,
}

/// Calls observed across every backend instance created by the factory
#[derive(Debug, Default)]
pub struct BackendLog {
    pub instances: usize,
    pub initialized_tables: Vec<String>,
    pub batches: Vec<usize>,
}

#[derive(Debug)]
pub struct MockBackend {
    behaviour: Behaviour,
    log: Arc<Mutex<BackendLog>>,
}

impl Backend for MockBackend {
    fn init(&mut self, table_name: &str, _columns: &[ColumnSpec]) -> Result<bool> {
        if self.behaviour == Behaviour::FailInit {
            return Err(Error::persistence("init refused", None));
        }
        self.log
            .lock()
            .unwrap()
            .initialized_tables
            .push(table_name.to_string());
        Ok(true)
    }

    fn insert_rows(&mut self, rows: &[Row]) -> Result<usize> {
        self.log.lock().unwrap().batches.push(rows.len());
        match self.behaviour {
            Behaviour::Accept => Ok(rows.len()),
            Behaviour::ShortCount => Ok(rows.len().saturating_sub(1)),
            Behaviour::FailInsert => Err(Error::persistence("insert refused", None)),
            Behaviour::FailInit => Ok(0),
        }
    }
}

/// Backend registry holding only the mock backend
pub fn mock_backends(behaviour: Behaviour) -> (BackendRegistry, Arc<Mutex<BackendLog>>) {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let factory_log = Arc::clone(&log);

    let mut registry = BackendRegistry::new();
    registry.register(
        MOCK_BACKEND,
        Arc::new(move |_: &BackendConfig| -> Result<Box<dyn Backend>> {
            factory_log.lock().unwrap().instances += 1;
            Ok(Box::new(MockBackend {
                behaviour,
                log: Arc::clone(&factory_log),
            }))
        }) as BackendFactory,
    );

    (registry, log)
}

/// Handler for `env` wired to a mock backend
pub fn mock_handler(env: &TestEnv, behaviour: Behaviour) -> (FileHandler, Arc<Mutex<BackendLog>>) {
    let (backends, log) = mock_backends(behaviour);
    let config = env.config.clone().with_backend(MOCK_BACKEND);
    let handler =
        FileHandler::with_registries(&config, &ParserRegistry::with_defaults(), &backends)
            .unwrap();
    (handler, log)
}
