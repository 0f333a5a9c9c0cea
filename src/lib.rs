//! Relabel - Resumable LLM Relabeling Library
//!
//! Re-labels every row of a tabular text dataset with a locally hosted,
//! OpenAI-compatible chat-completions endpoint, checkpointing progress so an
//! interrupted run resumes where it left off.
//! It includes:
//! - Checkpointed batch driver
//! - Dataset storage (CSV with atomic writes, in-memory)
//! - Run configuration and reports
//! - CLI definition and command handlers

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::{CommandResponse, DatasetStatus, LoadSource, RunConfig, RunSummary};
pub use services::{CheckpointDriver, DriverOptions};
pub use storage::{CsvDatasetStore, Dataset, DatasetStore, MemoryDatasetStore};
pub use utils::error::{AppError, AppResult};
