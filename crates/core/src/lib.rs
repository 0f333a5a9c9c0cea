//! Relabel Core
//!
//! Foundational types for the relabel workspace. This crate has zero
//! dependencies on application-level code (datasets, HTTP, LLM providers).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `label` - Closed label set and normalized labels (`LabelSet`, `Label`)
//! - `classifier` - Text classification abstraction (`Classifier`, `Classification`)
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/async-trait/thiserror**
//! 2. **Trait-based abstractions** - the driver only ever sees `Classifier`
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod classifier;
pub mod error;
pub mod label;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Labels ─────────────────────────────────────────────────────────────
pub use label::{Label, LabelSet, DEFAULT_LABELS};

// ── Classification ─────────────────────────────────────────────────────
pub use classifier::{Classification, Classifier};
