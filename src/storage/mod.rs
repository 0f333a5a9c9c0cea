//! Storage Layer
//!
//! Dataset persistence: the `DatasetStore` seam the driver writes through,
//! the CSV implementation, and an in-memory implementation.

pub mod csv_store;
pub mod dataset;
pub mod memory;

pub use csv_store::{read_csv, write_csv, CsvDatasetStore};
pub use dataset::{Dataset, Record, Schema, NULL_LABEL};
pub use memory::MemoryDatasetStore;

use crate::models::LoadSource;
use crate::utils::error::AppResult;

/// Durable home of the working dataset.
///
/// `load` returns the most recent snapshot: the checkpoint when one exists,
/// otherwise the pristine input. `persist` writes a full snapshot to the
/// checkpoint location.
pub trait DatasetStore {
    fn load(&self) -> AppResult<(Dataset, LoadSource)>;

    fn persist(&mut self, dataset: &Dataset) -> AppResult<()>;
}

impl<S: DatasetStore + ?Sized> DatasetStore for &mut S {
    fn load(&self) -> AppResult<(Dataset, LoadSource)> {
        (**self).load()
    }

    fn persist(&mut self, dataset: &Dataset) -> AppResult<()> {
        (**self).persist(dataset)
    }
}
