//! Text-generation oracle
//!
//! The fund consults an external language model through the narrow
//! [`Oracle`] trait. Backends:
//! - [`OllamaClient`] for a local Ollama server
//! - [`OfflineOracle`] which always fails, so every call takes the fallback
//!
//! [`FallbackOracle`] is the only way the pipeline talks to a backend: it
//! swaps any failure for [`FALLBACK_RESPONSE`], so parsers never see an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

use crate::config::{OracleBackend, OracleConfig};
use crate::error::{QuorumError, Result};

/// Safe reply substituted when the oracle cannot answer
pub const FALLBACK_RESPONSE: &str = "ACTION: HOLD\nSIZE: 0\nREASON: Fallback due to error.";

/// Prompt -> text, fallible
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}

/// Ollama generate request
#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama generate response (non-streaming)
#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a local Ollama server
pub struct OllamaClient {
    base_url: String,
    http: Client,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuorumError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl Oracle for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        debug!(model, "Sending request to Ollama");

        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(QuorumError::OracleUnavailable(format!(
                "Ollama error: {} - {}",
                status, body
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            QuorumError::OracleUnavailable(format!("Failed to parse Ollama response: {}", e))
        })?;

        let content = body.response.trim().to_string();
        debug!("Ollama response received: {} chars", content.len());
        Ok(content)
    }
}

/// Backend with no model behind it
pub struct OfflineOracle;

#[async_trait]
impl Oracle for OfflineOracle {
    async fn generate(&self, _prompt: &str, _model: &str) -> Result<String> {
        Err(QuorumError::OracleUnavailable(
            "offline backend has no model".to_string(),
        ))
    }
}

/// Build the configured backend
pub fn build_oracle(config: &OracleConfig) -> Result<Arc<dyn Oracle>> {
    Ok(match config.backend {
        OracleBackend::Ollama => Arc::new(OllamaClient::new(config)?),
        OracleBackend::Offline => Arc::new(OfflineOracle),
    })
}

/// Oracle boundary that never fails
#[derive(Clone)]
pub struct FallbackOracle {
    inner: Arc<dyn Oracle>,
    model: String,
}

impl FallbackOracle {
    pub fn new(inner: Arc<dyn Oracle>, model: impl Into<String>) -> Self {
        Self {
            inner,
            model: model.into(),
        }
    }

    /// Ask the oracle; any failure yields [`FALLBACK_RESPONSE`]
    pub async fn ask(&self, prompt: &str) -> String {
        match self.inner.generate(prompt, &self.model).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model = %self.model, "Oracle call failed, using fallback: {}", e);
                FALLBACK_RESPONSE.to_string()
            }
        }
    }
}
