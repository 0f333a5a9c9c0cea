//! Run Reports

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the working dataset was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// An existing checkpoint (resumed run)
    Checkpoint,
    /// The pristine input (first run)
    Input,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadSource::Checkpoint => write!(f, "checkpoint"),
            LoadSource::Input => write!(f, "input"),
        }
    }
}

/// Outcome of one driver run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub source: LoadSource,
    pub total_rows: usize,
    /// Unprocessed, non-quarantined rows when the run started
    pub pending_at_start: usize,
    /// Rows that received a label during this run
    pub newly_processed: usize,
    /// Classifier calls that returned Unknown during this run
    pub unknown: usize,
    /// Unprocessed rows at or past the attempt cap after this run
    pub quarantined: usize,
    /// Full-dataset writes performed during this run
    pub persists: usize,
    /// Unprocessed rows after this run (quarantined included)
    pub remaining: usize,
    /// True when the run exited early with nothing to do
    pub skipped_run: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped_run {
            return write!(
                f,
                "All {} rows already classified (loaded from {}); nothing to do",
                self.total_rows, self.source
            );
        }
        write!(
            f,
            "Newly classified: {} | Unknown: {} | Remaining: {} | Quarantined: {} | Writes: {}",
            self.newly_processed, self.unknown, self.remaining, self.quarantined, self.persists
        )
    }
}

/// Read-only dataset progress report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStatus {
    pub source: LoadSource,
    pub total_rows: usize,
    pub processed: usize,
    pub pending: usize,
    /// Processed rows whose new label differs from the original
    pub changed: usize,
    /// Pending rows at or past the attempt cap
    pub quarantined: usize,
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rows: {} (from {}) | Processed: {} | Pending: {} | Changed: {} | Quarantined: {}",
            self.total_rows,
            self.source,
            self.processed,
            self.pending,
            self.changed,
            self.quarantined
        )
    }
}
