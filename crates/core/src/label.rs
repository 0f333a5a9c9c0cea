//! Closed Label Set
//!
//! A classifier may only ever produce one of a fixed, finite set of labels.
//! Labels are stored trimmed and lower-cased so that matching a raw model
//! response is a plain string comparison after the same normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Labels used when no label set is configured.
pub const DEFAULT_LABELS: &[&str] = &["suicide ideation", "not suicide ideation"];

/// A label drawn from a `LabelSet`.
///
/// Only `LabelSet::normalize_response` constructs these, so holding a `Label`
/// proves membership in the set it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a free-form label (e.g. a record's
    /// original class).
    pub fn differs_from(&self, other: &str) -> bool {
        self.0 != other.to_lowercase()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fixed, finite set of acceptable classification outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set, normalizing each entry.
    ///
    /// Fails when the set is empty, contains a blank entry, or contains two
    /// entries that normalize to the same text.
    pub fn new<I, S>(labels: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in labels {
            let label = normalize(raw.as_ref());
            if label.is_empty() {
                return Err(CoreError::validation("labels must not be blank"));
            }
            if normalized.contains(&label) {
                return Err(CoreError::validation(format!("duplicate label: {}", label)));
            }
            normalized.push(label);
        }
        if normalized.is_empty() {
            return Err(CoreError::validation("label set must not be empty"));
        }
        Ok(Self { labels: normalized })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Trim and case-fold a raw response; return the matching label, if any.
    ///
    /// Matching is exact after normalization: "Suicide Ideation.\n" does not
    /// match because of the trailing period.
    pub fn normalize_response(&self, raw: &str) -> Option<Label> {
        let candidate = normalize(raw);
        self.labels
            .iter()
            .find(|l| **l == candidate)
            .map(|l| Label(l.clone()))
    }

    /// Render the labels as a quoted alternative list:
    /// `'a' or 'b'`, `'a', 'b' or 'c'`.
    pub fn quoted_alternatives(&self) -> String {
        let quoted: Vec<String> = self.labels.iter().map(|l| format!("'{}'", l)).collect();
        match quoted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for LabelSet {
    type Error = CoreError;

    fn try_from(value: Vec<String>) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.labels
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
