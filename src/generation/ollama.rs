//! Ollama text generation via `/api/generate`.

use super::Generator;
use crate::error::{RegscoutError, Result};
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Non-streaming generator backed by Ollama.
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: Option<bool>,
}

impl OllamaGenerator {
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

fn into_text(response: GenerateResponse) -> Result<String> {
    if response.done == Some(false) {
        return Err(RegscoutError::GenerationService(
            "Model returned an incomplete response".to_string(),
        ));
    }
    Ok(response.response)
}

#[async_trait]
impl Generator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response: GenerateResponse = self
            .client
            .post_json("api/generate", &request)
            .await
            .map_err(RegscoutError::GenerationService)?;

        let text = into_text(response)?;
        debug!("Generated {} characters", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
