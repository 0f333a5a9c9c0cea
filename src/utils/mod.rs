//! Utilities
//!
//! Common utilities used throughout the application.

pub mod error;
pub mod logging;

pub use error::*;
pub use logging::init_logging;
