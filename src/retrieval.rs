//! Query-time retrieval against a persisted index.

use crate::embedding::Embedder;
use crate::error::{RegscoutError, Result};
use crate::index::{MetadataFilter, SearchResult, VectorIndex};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Embeds questions and searches the persisted index.
///
/// The index is loaded on every call, so a concurrent re-ingestion is picked
/// up by the next query.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index_location: PathBuf,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index_location: impl Into<PathBuf>) -> Self {
        Self {
            embedder,
            index_location: index_location.into(),
        }
    }

    /// Return the `k` best chunks for `question`.
    ///
    /// `allowed_sources` restricts results to those source identifiers;
    /// `None` means no restriction.
    #[instrument(skip(self, allowed_sources), fields(question = %question))]
    pub async fn retrieve(
        &self,
        question: &str,
        allowed_sources: Option<&HashSet<String>>,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        retrieve(
            question,
            allowed_sources,
            k,
            self.embedder.as_ref(),
            &self.index_location,
        )
        .await
    }
}

/// Load the index at `index_location`, embed `question` and search.
pub async fn retrieve(
    question: &str,
    allowed_sources: Option<&HashSet<String>>,
    k: usize,
    embedder: &dyn Embedder,
    index_location: &Path,
) -> Result<Vec<SearchResult>> {
    if k == 0 {
        return Err(RegscoutError::InvalidArgument(
            "k must be greater than zero".to_string(),
        ));
    }

    let index = VectorIndex::load(index_location)?;

    if !index.embedding_model().is_empty() && index.embedding_model() != embedder.model() {
        warn!(
            "Index was built with '{}' but queries use '{}'",
            index.embedding_model(),
            embedder.model()
        );
    }

    let query = embedder.embed(question).await?;
    let filter = allowed_sources.map(|sources| MetadataFilter::sources(sources.iter().cloned()));

    let results = index.search(&query, k, filter.as_ref())?;
    debug!("Retrieved {} chunks", results.len());
    Ok(results)
}
