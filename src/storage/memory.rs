//! In-Memory Dataset Store
//!
//! Holds the input and checkpoint snapshots in memory and counts writes.
//! Can be told to fail a specific write, which stands in for a process that
//! dies mid-run.

use super::dataset::Dataset;
use super::DatasetStore;
use crate::models::LoadSource;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryDatasetStore {
    input: Dataset,
    checkpoint: Option<Dataset>,
    persist_count: usize,
    fail_on_persist: Option<usize>,
}

impl MemoryDatasetStore {
    pub fn new(input: Dataset) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Fail the `n`-th write (1-based) counted from now, once. Earlier and
    /// later writes succeed.
    pub fn fail_on_persist(mut self, n: usize) -> Self {
        self.fail_on_persist = Some(self.persist_count + n);
        self
    }

    pub fn checkpoint(&self) -> Option<&Dataset> {
        self.checkpoint.as_ref()
    }

    /// Successful writes so far.
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl DatasetStore for MemoryDatasetStore {
    fn load(&self) -> AppResult<(Dataset, LoadSource)> {
        match &self.checkpoint {
            Some(ds) => Ok((ds.clone(), LoadSource::Checkpoint)),
            None => Ok((self.input.clone(), LoadSource::Input)),
        }
    }

    fn persist(&mut self, dataset: &Dataset) -> AppResult<()> {
        if self.fail_on_persist == Some(self.persist_count + 1) {
            self.fail_on_persist = None;
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        self.checkpoint = Some(dataset.clone());
        self.persist_count += 1;
        Ok(())
    }
}
