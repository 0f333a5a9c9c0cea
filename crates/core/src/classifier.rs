//! Classifier Abstraction
//!
//! The batch driver depends only on this trait. Implementations wrap a single
//! external call and never fail outward: transport errors and out-of-set
//! responses both collapse into `Classification::Unknown`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::label::Label;

/// Outcome of one classification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A label from the closed label set.
    Labeled(Label),
    /// No usable label this attempt (transport failure or malformed output).
    Unknown,
}

impl Classification {
    pub fn label(&self) -> Option<&Label> {
        match self {
            Classification::Labeled(label) => Some(label),
            Classification::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Classification::Unknown)
    }
}

impl From<Option<Label>> for Classification {
    fn from(label: Option<Label>) -> Self {
        match label {
            Some(label) => Classification::Labeled(label),
            None => Classification::Unknown,
        }
    }
}

/// Text to label-or-unknown.
///
/// One call is one attempt: implementations do not retry internally and hold
/// no per-call state.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `text`. Must not panic or return an error for any input,
    /// including empty text.
    async fn classify(&self, text: &str) -> Classification;
}

#[async_trait]
impl<'a, C: Classifier + ?Sized> Classifier for &'a C {
    async fn classify(&self, text: &str) -> Classification {
        (**self).classify(text).await
    }
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    async fn classify(&self, text: &str) -> Classification {
        (**self).classify(text).await
    }
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Box<C> {
    async fn classify(&self, text: &str) -> Classification {
        (**self).classify(text).await
    }
}
