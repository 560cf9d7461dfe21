//! Per-file reports and run summaries

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::models::LoadOutcome;

/// Result of routing one data file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Base name of the data file
    pub file_name: String,

    /// Archive or failure placement
    pub outcome: LoadOutcome,

    /// Rows produced by the parser (0 when parsing did not complete)
    pub rows_parsed: usize,

    /// Rows the backend reported as persisted
    pub rows_inserted: usize,

    /// Where the file was moved to
    pub destination: PathBuf,

    /// Reason for failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Result of a parse-only check of one data file
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub file_name: String,

    /// Destination table the rows would be written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// Rows parsed when every line is valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,

    /// First error encountered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Reports for every file of one run
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Reports in processing order
    pub files: Vec<FileReport>,

    /// Total processing time
    pub processing_time: Duration,
}

impl LoadSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            files: Vec::new(),
            processing_time: Duration::ZERO,
        }
    }

    pub fn push(&mut self, report: FileReport) {
        self.files.push(report);
    }

    pub fn archived_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.archived_count()
    }

    /// Rows persisted across all files
    pub fn rows_inserted(&self) -> usize {
        self.files.iter().map(|f| f.rows_inserted).sum()
    }

    pub fn all_succeeded(&self) -> bool {
        self.files.iter().all(FileReport::is_success)
    }
}

impl Default for LoadSummary {
    fn default() -> Self {
        Self::new()
    }
}
