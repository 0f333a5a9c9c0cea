//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use relabel_core::CoreError;
use relabel_llm::LlmError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors (auto-converted from csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML config parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Dataset shape errors (missing columns, bad indices)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Errors from the core crate
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Errors from the LLM provider layer
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }
}

/// Convert AppError to a string
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
