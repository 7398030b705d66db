//! Text-generation providers.
//!
//! The harness consumes a single operation: send a prompt to a model,
//! get text and a latency back. Providers must never raise to the
//! caller; any transport failure is encoded into the returned text with
//! a fixed error marker and rejected by normal validation downstream.

use async_trait::async_trait;
use std::time::Duration;

mod ollama;

pub use ollama::OllamaClient;

/// Marker prefixing the text returned for any failed generation call.
pub const ERROR_MARKER: &str = "__ERROR__";

/// Options for one generation call.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Sampling temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 512,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Result of one generation call.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Generated text, or `__ERROR__: …` on failure
    pub text: String,

    /// Wall-clock latency of the call in milliseconds
    pub latency_ms: u64,
}

impl Generation {
    /// Build the failure value for a transport error.
    pub fn error(detail: impl std::fmt::Display, latency_ms: u64) -> Self {
        Self {
            text: format!("{ERROR_MARKER}: {detail}"),
            latency_ms,
        }
    }

    /// Whether this generation carries the failure marker.
    pub fn is_error(&self) -> bool {
        self.text.starts_with(ERROR_MARKER)
    }
}

/// Provider abstraction over the local inference endpoint.
///
/// Implementations catch every failure internally; the harness treats
/// the returned text as opaque.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt` with `model`.
    async fn generate(&self, model: &str, prompt: &str, options: &GenerateOptions) -> Generation;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
