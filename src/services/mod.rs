//! Services
//!
//! Business logic called by the commands.

pub mod driver;

pub use driver::{dataset_status, CheckpointDriver, DriverOptions};
