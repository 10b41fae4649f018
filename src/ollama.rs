//! Ollama HTTP client shared by the embedding and generation backends.

use crate::error::{RegscoutError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default timeout for Ollama requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Thin JSON client for a locally hosted Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OllamaClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| RegscoutError::Config(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;

        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegscoutError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL.
    pub fn endpoint(&self, path: &str) -> std::result::Result<Url, String> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| format!("invalid endpoint '{}': {}", path, e))
    }

    /// POST a JSON body and decode a JSON response.
    ///
    /// Errors are returned as messages so callers can attach them to the
    /// service-specific error variant.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> std::result::Result<R, String>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("{} returned {}: {}", url, status, text.trim()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read response from {}: {}", url, e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| format!("malformed response from {}: {}", url, e))
    }

    /// Check that the server answers at all.
    pub async fn ping(&self) -> std::result::Result<(), String> {
        let url = self.endpoint("api/tags")?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| format!("{} unreachable: {}", url, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("{} returned {}", url, response.status()))
        }
    }
}
