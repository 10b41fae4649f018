//! Deterministic test doubles for the embedding and generation backends.

use crate::embedding::Embedder;
use crate::error::{RegscoutError, Result};
use crate::generation::Generator;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const VOCABULARY: &[&str] = &[
    "sky", "blue", "grass", "green", "water", "boils", "color", "what", "record", "operator",
];

/// Bag-of-words embedder over a fixed vocabulary.
pub struct KeywordEmbedder;

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self
    }

    pub fn dimension(&self) -> usize {
        VOCABULARY.len()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; VOCABULARY.len()];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            if let Some(i) = VOCABULARY.iter().position(|w| *w == token) {
                vector[i] += 1.0;
            }
        }
        Ok(vector)
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

/// Embedder whose backend is always down.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RegscoutError::EmbeddingService("connection refused".to_string()))
    }

    fn model(&self) -> &str {
        "down"
    }
}

/// Generator that records prompts and returns a canned answer.
pub struct RecordingGenerator {
    answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    fn model(&self) -> &str {
        "recording"
    }
}

/// Generator whose backend is always down.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RegscoutError::GenerationService("model not loaded".to_string()))
    }

    fn model(&self) -> &str {
        "down"
    }
}

/// Write the two-document scenario corpus and return its directory.
pub fn write_scenario_docs(root: &Path) -> PathBuf {
    let docs = root.join("documents");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::write(docs.join("A.txt"), "The sky is blue. Grass is green.").unwrap();
    std::fs::write(docs.join("B.txt"), "Water boils at 100C.").unwrap();
    docs
}
