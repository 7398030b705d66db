//! Ollama provider implementation.
//!
//! Calls the local Ollama server's `/api/generate` endpoint with
//! streaming disabled. Any failure (connect error, timeout, non-success
//! status, undecodable body) is folded into the returned text behind
//! [`ERROR_MARKER`](super::ERROR_MARKER) so the call itself never fails.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerateOptions, Generation, TextGenerator};

/// Default base URL of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client against the default local endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Ollama generate request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaRequestOptions,
}

#[derive(Debug, Serialize)]
struct OllamaRequestOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama generate response format (non-streaming).
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    async fn call(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, reqwest::Error> {
        let request = OllamaRequest {
            model,
            prompt,
            stream: false,
            options: OllamaRequestOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(options.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: OllamaResponse = response.json().await?;
        Ok(body.response)
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str, options: &GenerateOptions) -> Generation {
        let start = Instant::now();
        let result = self.call(model, prompt, options).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => Generation { text, latency_ms },
            Err(e) => {
                tracing::warn!(model, error = %e, "generation call failed");
                Generation::error(e, latency_ms)
            }
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
