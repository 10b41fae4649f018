//! Embedding generation for semantic search and retrieval.

mod ollama;

pub use ollama::OllamaEmbedder;

use crate::error::{RegscoutError, Result};
use async_trait::async_trait;

/// Default embedding model served by Ollama.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        check_batch(texts.len(), &embeddings)?;
        Ok(embeddings)
    }

    /// Identifier of the model producing the vectors.
    fn model(&self) -> &str;
}

/// Verify a batch has one vector per input and a single dimension.
pub(crate) fn check_batch(expected: usize, embeddings: &[Vec<f32>]) -> Result<()> {
    if embeddings.len() != expected {
        return Err(RegscoutError::EmbeddingService(format!(
            "expected {} embeddings, got {}",
            expected,
            embeddings.len()
        )));
    }
    if let Some(first) = embeddings.first() {
        if let Some(bad) = embeddings.iter().find(|e| e.len() != first.len()) {
            return Err(RegscoutError::EmbeddingService(format!(
                "inconsistent embedding dimensions: {} and {}",
                first.len(),
                bad.len()
            )));
        }
    }
    Ok(())
}
