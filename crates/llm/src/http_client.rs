//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients for local
//! inference endpoints.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client`.
///
/// Environment proxies are ignored (`no_proxy`): the endpoint is a local
/// inference server. `timeout` bounds each whole request; `None` keeps the
/// reqwest default of no timeout.
pub fn build_http_client(timeout: Option<Duration>) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().no_proxy();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| LlmError::Other {
        message: format!("failed to build HTTP client: {}", e),
    })
}
