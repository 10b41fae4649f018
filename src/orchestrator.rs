//! Pipeline orchestrator for Regscout.
//!
//! Builds the embedder, generator and prompts from [`Settings`] and hands out
//! the ingestion pipeline and RAG engine wired to them.

use crate::chunking::ChunkConfig;
use crate::config::{Prompts, Settings};
use crate::documents::DocumentSource;
use crate::embedding::{Embedder, OllamaEmbedder};
use crate::error::Result;
use crate::generation::{Generator, OllamaGenerator};
use crate::ingest::{IngestPipeline, IngestReport};
use crate::ollama::OllamaClient;
use crate::rag::{AnswerComposer, RagEngine};
use crate::retrieval::Retriever;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the Regscout pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    index_path: PathBuf,
}

impl Orchestrator {
    /// Create an orchestrator backed by the configured Ollama server.
    pub fn new(settings: Settings) -> Result<Self> {
        let ollama = OllamaClient::with_timeout(
            &settings.ollama.base_url,
            Duration::from_secs(settings.ollama.timeout_secs),
        )?;

        let embedder: Arc<dyn Embedder> =
            Arc::new(OllamaEmbedder::new(ollama.clone(), &settings.embedding.model));
        let generator: Arc<dyn Generator> =
            Arc::new(OllamaGenerator::new(ollama.clone(), &settings.generation.model));

        info!(
            "Using Ollama at {} (embedding: {}, generation: {})",
            ollama.base_url(),
            settings.embedding.model,
            settings.generation.model
        );

        Self::with_components(settings, embedder, generator)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let index_path = settings.index_path();

        Ok(Self {
            settings,
            prompts,
            embedder,
            generator,
            index_path,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// The configured document directory.
    pub fn document_source(&self) -> DocumentSource {
        DocumentSource::new(self.settings.documents_dir(), &self.settings.general.extensions)
            .with_category(&self.settings.general.category)
    }

    /// List available document source identifiers.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        self.document_source().list()
    }

    /// Rebuild the index from the document directory.
    ///
    /// `profile` selects a chunking profile; `None` uses the configured one.
    #[instrument(skip(self))]
    pub async fn ingest(&self, profile: Option<&str>) -> Result<IngestReport> {
        let chunk_config = self.settings.chunking.resolve(profile)?;
        self.ingest_with(chunk_config).await
    }

    /// Rebuild the index with an explicit chunking configuration.
    pub async fn ingest_with(&self, chunk_config: ChunkConfig) -> Result<IngestReport> {
        let pipeline = IngestPipeline::new(self.embedder.clone(), chunk_config)?;
        pipeline.ingest(&self.document_source(), &self.index_path).await
    }

    /// A retriever over the configured index.
    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.embedder.clone(), self.index_path.clone())
    }

    /// An answer composer using the configured generator and prompts.
    pub fn composer(&self) -> AnswerComposer {
        AnswerComposer::new(self.generator.clone()).with_prompts(self.prompts.clone())
    }

    /// A RAG engine retrieving `k` chunks, or the configured default.
    pub fn rag_engine(&self, k: Option<usize>) -> RagEngine {
        RagEngine::new(
            self.retriever(),
            self.composer(),
            k.unwrap_or(self.settings.retrieval.k),
        )
    }
}
