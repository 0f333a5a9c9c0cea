//! Response Types
//!
//! Envelope for machine-readable command output (`--json`).

use serde::{Deserialize, Serialize};

/// Generic command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Endpoint health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub endpoint: String,
    pub model: String,
    /// Models advertised by the endpoint, when it lists them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    /// Whether the configured model appears in `models`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_listed: Option<bool>,
}

impl HealthResponse {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: "relabel".to_string(),
            endpoint: endpoint.into(),
            model: model.into(),
            models: None,
            model_listed: None,
        }
    }

    /// Record the endpoint's model list
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.model_listed = Some(models.iter().any(|m| m == &self.model));
        self.models = Some(models);
        self
    }
}

impl std::fmt::Display for HealthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Endpoint {} is {} (model: {})", self.endpoint, self.status, self.model)?;
        match self.model_listed {
            Some(false) => write!(f, "; model not listed by endpoint"),
            _ => Ok(()),
        }
    }
}
