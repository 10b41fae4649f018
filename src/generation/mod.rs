//! Language-model backends for answer generation.

mod ollama;

pub use ollama::OllamaGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Default generation model served by Ollama.
pub const DEFAULT_GENERATION_MODEL: &str = "mistral";

/// Trait for single request/response text generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model producing the text.
    fn model(&self) -> &str;
}
