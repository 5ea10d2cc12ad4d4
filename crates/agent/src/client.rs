//! Generative model client.
//!
//! The loops only need "send an instruction-bound prompt, get text
//! back"; everything model-specific lives behind [`GenerativeClient`].
//! The shipped implementation talks to Ollama's generate API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// An external generative capability.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generate free-form text for `prompt` under the behavior contract
    /// given by `system`. Errors (timeout, quota, malformed response)
    /// surface as `Err`; callers decide whether they are fatal.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Ollama generate-API client.
#[derive(Clone)]
pub struct OllamaClient {
    /// HTTP client
    client: Client,

    /// Ollama server URL
    url: String,

    /// Model name
    model: String,
}

impl OllamaClient {
    /// Create a new Ollama client. Every request carries `timeout`, so
    /// a stuck model call fails the request rather than blocking the
    /// batch indefinitely.
    pub fn new(url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url,
            model,
        }
    }
}

#[async_trait]
impl GenerativeClient for OllamaClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "system": system,
            "prompt": prompt,
            "stream": false,
        });

        debug!("Generating completion ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&payload)
            .send()
            .await
            .context("Failed to call Ollama generate API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama API error (status {}): {}", status, error_text);
        }

        #[derive(serde::Deserialize)]
        struct Response {
            response: String,
        }

        let response_data: Response = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(response_data.response)
    }
}
