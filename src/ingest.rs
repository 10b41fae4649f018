//! Ingestion pipeline: documents → chunks → embeddings → persisted index.

use crate::chunking::{Chunk, ChunkConfig, TextSplitter};
use crate::documents::DocumentSource;
use crate::embedding::{check_batch, Embedder};
use crate::error::Result;
use crate::index::{IndexEntry, VectorIndex};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Summary of a completed ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Number of documents read.
    pub documents: usize,
    /// Number of chunks embedded and indexed.
    pub chunks: usize,
    /// Embedding dimension (0 when nothing was indexed).
    pub dimension: usize,
}

/// Builds and persists a vector index from a document directory.
pub struct IngestPipeline {
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
}

impl IngestPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, chunk_config: ChunkConfig) -> Result<Self> {
        Ok(Self {
            embedder,
            splitter: TextSplitter::new(chunk_config)?,
        })
    }

    /// Run the full pipeline and save to `index_location`.
    ///
    /// Nothing is written unless every document was read and every chunk
    /// embedded.
    #[instrument(skip(self, source), fields(dir = %source.dir().display()))]
    pub async fn ingest(&self, source: &DocumentSource, index_location: &Path) -> Result<IngestReport> {
        let documents = source.load_all()?;
        info!("Loaded {} documents", documents.len());

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.splitter.split_document(doc))
            .collect();
        info!(
            "Created {} chunks (max_size={}, overlap={})",
            chunks.len(),
            self.splitter.config().max_size,
            self.splitter.config().overlap
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        check_batch(texts.len(), &embeddings)?;

        let entries: Vec<IndexEntry> = embeddings
            .into_iter()
            .zip(chunks)
            .map(|(vector, chunk)| IndexEntry::new(vector, chunk))
            .collect();

        let index = VectorIndex::build(entries)?.with_embedding_model(self.embedder.model());
        index.save(index_location)?;

        Ok(IngestReport {
            documents: documents.len(),
            chunks: index.len(),
            dimension: index.dimension(),
        })
    }
}

/// Convenience wrapper running one ingestion.
///
/// Only `.txt` files are read. Use [`IngestPipeline`] with a configured
/// [`DocumentSource`] for other extensions.
pub async fn ingest(
    documents_dir: &Path,
    index_location: &Path,
    chunk_config: ChunkConfig,
    embedder: Arc<dyn Embedder>,
) -> Result<IngestReport> {
    let source = DocumentSource::new(documents_dir, &["txt".to_string()]);
    IngestPipeline::new(embedder, chunk_config)?
        .ingest(&source, index_location)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegscoutError;
    use crate::test_support::{write_scenario_docs, FailingEmbedder, KeywordEmbedder};

    #[tokio::test]
    async fn test_ingest_builds_index() {
        let dir = tempfile::tempdir().unwrap();
        let docs = write_scenario_docs(dir.path());
        let index_path = dir.path().join("index").join("regs.db");

        let report = ingest(
            &docs,
            &index_path,
            ChunkConfig::new(20, 5).unwrap(),
            Arc::new(KeywordEmbedder::new()),
        )
        .await
        .unwrap();

        assert_eq!(report.documents, 2);
        assert_eq!(report.chunks, 3);
        assert_eq!(report.dimension, KeywordEmbedder::new().dimension());

        let index = VectorIndex::load(&index_path).unwrap();
        assert_eq!(index.embedding_model(), "keyword-test");
        let sources: Vec<String> = index.sources().into_iter().map(|s| s.source_id).collect();
        assert_eq!(sources, vec!["A.txt", "B.txt"]);
        assert!(index.entries().iter().all(|e| e.chunk.meta("type") == Some("regulation")));
    }

    #[tokio::test]
    async fn test_ingest_reads_only_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        let docs = write_scenario_docs(dir.path());
        std::fs::write(docs.join("notes.md"), "The sky is green.").unwrap();
        let index_path = dir.path().join("regs.db");

        let report = ingest(
            &docs,
            &index_path,
            ChunkConfig::new(1000, 200).unwrap(),
            Arc::new(KeywordEmbedder::new()),
        )
        .await
        .unwrap();

        assert_eq!(report.documents, 2);
        let index = VectorIndex::load(&index_path).unwrap();
        assert!(index.sources().iter().all(|s| s.source_id.ends_with(".txt")));
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let docs = write_scenario_docs(dir.path());
        let first = dir.path().join("first.db");
        let second = dir.path().join("second.db");
        let config = ChunkConfig::new(20, 5).unwrap();

        ingest(&docs, &first, config, Arc::new(KeywordEmbedder::new())).await.unwrap();
        ingest(&docs, &second, config, Arc::new(KeywordEmbedder::new())).await.unwrap();

        assert_eq!(
            VectorIndex::load(&first).unwrap().entries(),
            VectorIndex::load(&second).unwrap().entries()
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_keeps_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let docs = write_scenario_docs(dir.path());
        let index_path = dir.path().join("regs.db");
        let config = ChunkConfig::new(20, 5).unwrap();

        ingest(&docs, &index_path, config, Arc::new(KeywordEmbedder::new())).await.unwrap();

        let result = ingest(&docs, &index_path, config, Arc::new(FailingEmbedder)).await;
        assert!(matches!(result, Err(RegscoutError::EmbeddingService(_))));

        assert_eq!(VectorIndex::load(&index_path).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_documents_dir_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("regs.db");

        let result = ingest(
            &dir.path().join("missing"),
            &index_path,
            ChunkConfig::default(),
            Arc::new(KeywordEmbedder::new()),
        )
        .await;

        assert!(matches!(result, Err(RegscoutError::DocumentRead { .. })));
        assert!(!index_path.exists());
    }

    #[test]
    fn test_invalid_chunk_config() {
        let result = IngestPipeline::new(
            Arc::new(KeywordEmbedder::new()),
            ChunkConfig { max_size: 5, overlap: 5 },
        );
        assert!(matches!(result, Err(RegscoutError::InvalidConfig(_))));
    }
}
