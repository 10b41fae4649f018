//! Vector index over embedded chunks.
//!
//! An index is built once from a full set of entries, persisted to a single
//! file, and loaded read-only for queries. There is no incremental update:
//! re-ingestion replaces the whole file.

mod filter;
mod sqlite;

pub use filter::MetadataFilter;

use crate::chunking::Chunk;
use crate::error::{RegscoutError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// A chunk together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub vector: Vec<f32>,
    pub chunk: Chunk,
}

impl IndexEntry {
    pub fn new(vector: Vec<f32>, chunk: Chunk) -> Self {
        Self { vector, chunk }
    }
}

/// A search result with score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Cosine similarity (higher is better).
    pub score: f32,
}

/// Number of indexed chunks per source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source_id: String,
    pub chunk_count: usize,
}

/// In-memory vector index with exact cosine search.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimension: usize,
    embedding_model: String,
    built_at: DateTime<Utc>,
}

impl VectorIndex {
    /// Build an index from scratch. All vectors must share one dimension.
    pub fn build(entries: Vec<IndexEntry>) -> Result<Self> {
        let dimension = entries.first().map(|e| e.vector.len()).unwrap_or(0);

        for (position, entry) in entries.iter().enumerate() {
            if entry.vector.is_empty() {
                return Err(RegscoutError::InvalidArgument(format!(
                    "entry {} has an empty vector",
                    position
                )));
            }
            if entry.vector.len() != dimension {
                return Err(RegscoutError::InvalidArgument(format!(
                    "entry {} has dimension {}, expected {}",
                    position,
                    entry.vector.len(),
                    dimension
                )));
            }
            if entry.vector.iter().any(|v| !v.is_finite()) {
                return Err(RegscoutError::InvalidArgument(format!(
                    "entry {} contains non-finite values",
                    position
                )));
            }
        }

        debug!("Built index with {} entries of dimension {}", entries.len(), dimension);

        Ok(Self {
            entries,
            dimension,
            embedding_model: String::new(),
            built_at: Utc::now(),
        })
    }

    /// Record the embedding model that produced the vectors.
    pub fn with_embedding_model(mut self, model: &str) -> Self {
        self.embedding_model = model.to_string();
        self
    }

    /// Return up to `k` entries ranked by descending similarity to `query`.
    ///
    /// Only entries accepted by `filter` are ranked. Equal scores keep
    /// insertion order.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(RegscoutError::InvalidArgument(
                "k must be greater than zero".to_string(),
            ));
        }
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(RegscoutError::InvalidArgument(format!(
                "query has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(RegscoutError::InvalidArgument(
                "query contains non-finite values".to_string(),
            ));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.map_or(true, |f| f.matches(&e.chunk)))
            .map(|(i, e)| (i, cosine_similarity(query, &e.vector)))
            .collect();

        // sort_by is stable, so ties stay in insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        debug!("Search returned {} of {} entries", scored.len(), self.entries.len());

        Ok(scored
            .into_iter()
            .map(|(i, score)| SearchResult {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimension, or 0 for an empty index.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Indexed sources in order of first appearance.
    pub fn sources(&self) -> Vec<SourceSummary> {
        let mut summaries: Vec<SourceSummary> = Vec::new();
        for entry in &self.entries {
            match summaries
                .iter_mut()
                .find(|s| s.source_id == entry.chunk.source_id)
            {
                Some(summary) => summary.chunk_count += 1,
                None => summaries.push(SourceSummary {
                    source_id: entry.chunk.source_id.clone(),
                    chunk_count: 1,
                }),
            }
        }
        summaries
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chunking::SOURCE_KEY;
    use std::collections::BTreeMap;

    pub(crate) fn entry(source: &str, text: &str, vector: Vec<f32>) -> IndexEntry {
        let mut metadata = BTreeMap::new();
        metadata.insert(SOURCE_KEY.to_string(), source.to_string());
        metadata.insert("type".to_string(), "regulation".to_string());
        IndexEntry::new(
            vector,
            Chunk {
                text: text.to_string(),
                source_id: source.to_string(),
                metadata,
                start: 0,
                end: text.chars().count(),
            },
        )
    }

    pub(crate) fn sample_index() -> VectorIndex {
        VectorIndex::build(vec![
            entry("a.txt", "alpha", vec![1.0, 0.0, 0.0]),
            entry("b.txt", "beta", vec![0.0, 1.0, 0.0]),
            entry("a.txt", "alpha-beta", vec![0.7, 0.7, 0.0]),
            entry("c.txt", "gamma", vec![0.0, 0.0, 1.0]),
            entry("b.txt", "beta-gamma", vec![0.0, 0.6, 0.8]),
        ])
        .unwrap()
        .with_embedding_model("test-model")
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_ranks_and_limits() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.2, 0.0], 3, None).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.text, "alpha");
        assert_eq!(results[1].chunk.text, "alpha-beta");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        let all = index.search(&[1.0, 0.2, 0.0], 100, None).unwrap();
        assert_eq!(all.len(), index.len());
    }

    #[test]
    fn test_search_with_filter() {
        let index = sample_index();
        let filter = MetadataFilter::sources(["b.txt"]);

        let results = index.search(&[1.0, 0.0, 0.0], 10, Some(&filter)).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.chunk.source_id == "b.txt"));

        let nothing = MetadataFilter::sources(Vec::<String>::new());
        assert!(index.search(&[1.0, 0.0, 0.0], 10, Some(&nothing)).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = VectorIndex::build(vec![
            entry("x.txt", "first", vec![1.0, 0.0]),
            entry("x.txt", "second", vec![2.0, 0.0]),
            entry("x.txt", "third", vec![0.5, 0.0]),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 3, None).unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_search_rejects_zero_k() {
        let index = sample_index();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 0, None),
            Err(RegscoutError::InvalidArgument(_))
        ));

        let empty = VectorIndex::build(Vec::new()).unwrap();
        assert!(matches!(
            empty.search(&[1.0], 0, None),
            Err(RegscoutError::InvalidArgument(_))
        ));
        assert!(empty.search(&[1.0], 3, None).unwrap().is_empty());
    }

    #[test]
    fn test_search_rejects_dimension_mismatch() {
        assert!(matches!(
            sample_index().search(&[1.0, 0.0], 1, None),
            Err(RegscoutError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let result = VectorIndex::build(vec![
            entry("a.txt", "one", vec![1.0, 0.0]),
            entry("a.txt", "two", vec![1.0, 0.0, 0.0]),
        ]);
        assert!(matches!(result, Err(RegscoutError::InvalidArgument(_))));

        let result = VectorIndex::build(vec![entry("a.txt", "nan", vec![f32::NAN, 1.0])]);
        assert!(matches!(result, Err(RegscoutError::InvalidArgument(_))));
    }

    #[test]
    fn test_sources_summary() {
        let sources = sample_index().sources();
        assert_eq!(
            sources,
            vec![
                SourceSummary { source_id: "a.txt".to_string(), chunk_count: 2 },
                SourceSummary { source_id: "b.txt".to_string(), chunk_count: 2 },
                SourceSummary { source_id: "c.txt".to_string(), chunk_count: 1 },
            ]
        );
    }
}
