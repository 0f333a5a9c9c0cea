//! LLM-Backed Classifier
//!
//! Adapts any `LlmProvider` to the core `Classifier` trait: one single-turn
//! request per call, deterministic settings, and a closed-set check on the
//! reply. Every failure becomes `Classification::Unknown`.

use std::sync::Arc;

use async_trait::async_trait;
use relabel_core::{Classification, Classifier, LabelSet};
use tracing::{debug, warn};

use crate::provider::LlmProvider;
use crate::types::Message;

/// Classifier that asks an LLM to pick one label from a closed set.
pub struct LlmClassifier {
    provider: Arc<dyn LlmProvider>,
    labels: LabelSet,
    system_prompt: String,
}

impl LlmClassifier {
    /// Create a classifier; sampling settings come from the provider's config.
    pub fn new(provider: Arc<dyn LlmProvider>, labels: LabelSet) -> Self {
        let system_prompt = system_prompt(&labels);
        Self {
            provider,
            labels,
            system_prompt,
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn user_prompt(&self, text: &str) -> String {
        format!(
            "Text to classify:\n{}\n\nAnswer strictly with either {}.",
            text,
            self.labels.quoted_alternatives()
        )
    }
}

fn system_prompt(labels: &LabelSet) -> String {
    format!(
        "You are a text classification assistant. The user will provide some text, \
         and you must classify it strictly as {}.",
        labels.quoted_alternatives()
    )
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Classification {
        let response = self
            .provider
            .send_message(
                vec![Message::user(self.user_prompt(text))],
                Some(self.system_prompt.clone()),
            )
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "classification request failed");
                return Classification::Unknown;
            }
        };

        let Some(content) = response.content else {
            warn!(provider = self.provider.name(), "classification response had no content");
            return Classification::Unknown;
        };

        match self.labels.normalize_response(&content) {
            Some(label) => Classification::Labeled(label),
            None => {
                debug!(response = %content.trim(), "response outside the label set");
                Classification::Unknown
            }
        }
    }
}
