//! Generation backend client.
//!
//! The relay only needs "prompt in, text out" plus a liveness probe, so the backend sits behind
//! the [`TextGenerator`] trait. [`OllamaClient`] is the production implementation against the
//! Ollama HTTP API (non-streaming `/api/generate`, `/api/version` for health).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Every way a generation call can fail. The relay treats all variants the same.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("ollama request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("ollama returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed ollama response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`, giving up after `timeout`.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationError>;

    /// Whether the backend answers its status endpoint within `timeout`. Never errors.
    async fn is_available(&self, timeout: Duration) -> bool;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the Ollama HTTP API.
#[derive(Clone)]
pub struct OllamaClient {
    generate_url: String,
    version_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// `generate_url` is the full `/api/generate` endpoint, e.g.
    /// `http://localhost:11434/api/generate`.
    pub fn new(generate_url: impl Into<String>) -> Self {
        let generate_url = generate_url.into();
        let version_url = version_url_for(&generate_url);
        Self {
            generate_url,
            version_url,
            client: reqwest::Client::new(),
        }
    }
}

/// Derive the `/api/version` URL from the configured generate URL.
fn version_url_for(generate_url: &str) -> String {
    let trimmed = generate_url.trim_end_matches('/');
    match trimmed.strip_suffix("/api/generate") {
        Some(base) => format!("{}/api/version", base),
        None => format!("{}/api/version", trimmed),
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationError> {
        tracing::debug!(url = %self.generate_url, model, prompt_chars = prompt.chars().count(), "Sending generate request");

        let res = self
            .client
            .post(&self.generate_url)
            .timeout(timeout)
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status { status, body });
        }

        let data: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
        Ok(data.response)
    }

    async fn is_available(&self, timeout: Duration) -> bool {
        match self
            .client
            .get(&self.version_url)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                tracing::warn!(status = %res.status(), url = %self.version_url, "Ollama health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %self.version_url, "Ollama unreachable");
                false
            }
        }
    }
}
