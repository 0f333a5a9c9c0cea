//! Relabel LLM
//!
//! Provides the interface for talking to a text-generation endpoint:
//! - `LlmProvider` trait with an OpenAI-compatible chat-completions
//!   implementation (LM Studio, llama.cpp, Ollama `/v1`, vLLM)
//! - `LlmClassifier`, the closed-label-set classifier built on a provider
//!
//! Also includes the HTTP client factory.

pub mod classifier;
pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use classifier::LlmClassifier;
pub use http_client::build_http_client;
pub use openai::{OpenAIProvider, DEFAULT_CHAT_COMPLETIONS_URL};
pub use provider::LlmProvider;
pub use types::*;
