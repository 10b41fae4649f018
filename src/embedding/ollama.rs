//! Ollama embeddings implementation.

use super::Embedder;
use crate::error::{RegscoutError, Result};
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Embedder backed by Ollama's `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

/// Validate a decoded response body.
fn into_vector(response: EmbeddingResponse) -> Result<Vec<f32>> {
    if response.embedding.is_empty() {
        return Err(RegscoutError::EmbeddingService(
            "Empty embedding in response".to_string(),
        ));
    }
    if response.embedding.iter().any(|v| !v.is_finite()) {
        return Err(RegscoutError::EmbeddingService(
            "Embedding contains non-finite values".to_string(),
        ));
    }
    Ok(response.embedding)
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model, len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response: EmbeddingResponse = self
            .client
            .post_json("api/embeddings", &request)
            .await
            .map_err(RegscoutError::EmbeddingService)?;

        let vector = into_vector(response)?;
        debug!("Generated embedding with {} dimensions", vector.len());
        Ok(vector)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_validation() {
        let ok: EmbeddingResponse = serde_json::from_str(r#"{"embedding": [0.5, -1.0, 2]}"#).unwrap();
        assert_eq!(into_vector(ok).unwrap(), vec![0.5, -1.0, 2.0]);

        let empty: EmbeddingResponse = serde_json::from_str(r#"{"embedding": []}"#).unwrap();
        assert!(matches!(into_vector(empty), Err(RegscoutError::EmbeddingService(_))));

        // Missing field fails at decode time.
        assert!(serde_json::from_str::<EmbeddingResponse>(r#"{"vector": [1.0]}"#).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = OllamaClient::new("http://127.0.0.1:1").unwrap();
        let embedder = OllamaEmbedder::new(client, "nomic-embed-text");

        assert_eq!(embedder.model(), "nomic-embed-text");
        assert!(matches!(
            embedder.embed("hello").await,
            Err(RegscoutError::EmbeddingService(_))
        ));
    }
}
