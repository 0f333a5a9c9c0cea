//! Core Error Types
//!
//! Defines the foundational error type used across the relabel workspace.
//! Kept dependency-free (only thiserror + std) so the core crate stays
//! lightweight.
//!
//! The application crate extends this with additional variants (I/O, CSV,
//! dataset shape, LLM transport) that require heavier dependencies.

use thiserror::Error;

/// Core error type for the relabel workspace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Validation errors (e.g. an unusable label set)
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
