//! Data Models
//!
//! Configuration and report types shared by the driver and the CLI.

pub mod config;
pub mod response;
pub mod summary;

pub use config::{ColumnNames, RunConfig, DEFAULT_CHECKPOINT_INTERVAL};
pub use response::{CommandResponse, HealthResponse};
pub use summary::{DatasetStatus, LoadSource, RunSummary};
