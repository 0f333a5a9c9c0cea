//! Run Configuration
//!
//! Everything a run needs, in one explicit structure: dataset paths,
//! checkpoint interval, endpoint, and the closed label set. Values come from
//! built-in defaults, then an optional JSON/TOML file, then CLI flags.

use std::path::{Path, PathBuf};

use relabel_core::{LabelSet, DEFAULT_LABELS};
use relabel_llm::{ProviderConfig, DEFAULT_CHAT_COMPLETIONS_URL};
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Default number of successful classifications between checkpoints
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1000;

/// Dataset column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    /// Input text to classify
    pub text: String,
    /// Prior classification
    pub label: String,
    /// Classification produced by this tool
    pub new_label: String,
    /// Whether the new label differs from the prior one
    pub changed: String,
    /// 0/1 completion flag
    pub processed: String,
    /// Failed-attempt counter (only used when `max_attempts` is set)
    pub attempts: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            text: "text".to_string(),
            label: "class".to_string(),
            new_label: "New_Class".to_string(),
            changed: "Changed".to_string(),
            processed: "Reclassified".to_string(),
            attempts: "Attempts".to_string(),
        }
    }
}

impl ColumnNames {
    fn all(&self) -> [(&'static str, &str); 6] {
        [
            ("text", &self.text),
            ("label", &self.label),
            ("new_label", &self.new_label),
            ("changed", &self.changed),
            ("processed", &self.processed),
            ("attempts", &self.attempts),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = self.all();
        for (i, (key, name)) in all.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(format!("column name for '{}' must not be empty", key));
            }
            if let Some((other, _)) = all[..i].iter().find(|(_, n)| n == name) {
                return Err(format!(
                    "columns '{}' and '{}' both use the name '{}'",
                    other, key, name
                ));
            }
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Pristine input dataset, read only when no checkpoint exists
    pub input_path: PathBuf,
    /// Checkpoint/output dataset, read at start when present and rewritten
    pub checkpoint_path: PathBuf,
    /// Successful classifications between checkpoint writes
    pub checkpoint_interval: usize,
    /// Chat-completions endpoint URL
    pub endpoint_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Optional bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Closed label set
    pub labels: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout; unset keeps the transport default (none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Quarantine records after this many Unknown outcomes (off when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    pub columns: ColumnNames,
}

impl Default for RunConfig {
    fn default() -> Self {
        let provider = ProviderConfig::default();
        Self {
            input_path: PathBuf::from("Suicide_Detection.csv"),
            checkpoint_path: PathBuf::from("DeepSeekR1DistillQwen7b_Suicide_Detection.csv"),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            endpoint_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            model: provider.model,
            api_key: None,
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            temperature: provider.temperature,
            max_tokens: provider.max_tokens,
            request_timeout_secs: None,
            max_attempts: None,
            columns: ColumnNames::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a file (JSON or TOML, by extension)
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let config: RunConfig = match extension {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => {
                return Err(AppError::config(format!(
                    "Unsupported config file format: {}. Use .json or .toml",
                    extension
                )))
            }
        };
        Ok(config)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.checkpoint_interval == 0 {
            return Err("checkpoint_interval must be at least 1".to_string());
        }

        if self.input_path.as_os_str().is_empty() {
            return Err("input_path must not be empty".to_string());
        }
        if self.checkpoint_path.as_os_str().is_empty() {
            return Err("checkpoint_path must not be empty".to_string());
        }

        match url::Url::parse(&self.endpoint_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(format!(
                    "endpoint_url must use http or https, got '{}'",
                    url.scheme()
                ))
            }
            Err(e) => return Err(format!("Invalid endpoint_url '{}': {}", self.endpoint_url, e)),
        }

        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        LabelSet::new(&self.labels).map_err(|e| e.to_string())?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be at least 1".to_string());
        }

        if self.max_attempts == Some(0) {
            return Err("max_attempts must be at least 1".to_string());
        }

        self.columns.validate()
    }

    /// Validate, mapping failures to `AppError::Config`
    pub fn validated(self) -> AppResult<Self> {
        self.validate().map_err(AppError::config)?;
        Ok(self)
    }

    pub fn label_set(&self) -> AppResult<LabelSet> {
        Ok(LabelSet::new(&self.labels)?)
    }

    /// Provider settings for the chat-completions endpoint
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.api_key.clone(),
            base_url: Some(self.endpoint_url.clone()),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}
