//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! [`AnswerComposer`] turns retrieved chunks into a grounded prompt and calls
//! the language model; [`RagEngine`] wires it to a [`Retriever`].
//!
//! [`Retriever`]: crate::retrieval::Retriever

mod composer;
mod engine;

pub use composer::AnswerComposer;
pub use engine::RagEngine;

use crate::index::SearchResult;
use serde::Serialize;
use std::collections::BTreeSet;

/// A generated answer with the sources it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// The generated answer.
    pub answer: String,
    /// Distinct source identifiers of the chunks supplied as context.
    pub sources: BTreeSet<String>,
}

/// Format search results as prompt context, preserving rank order.
pub fn format_context_for_prompt(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("[From {}]: {}", r.chunk.source_id, r.chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Distinct source identifiers of `results`.
pub fn collect_sources(results: &[SearchResult]) -> BTreeSet<String> {
    results.iter().map(|r| r.chunk.source_id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::entry;

    fn result(source: &str, text: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: entry(source, text, vec![1.0]).chunk,
            score,
        }
    }

    #[test]
    fn test_context_keeps_rank_order() {
        let results = vec![
            result("b.txt", "second source first", 0.9),
            result("a.txt", "first source second", 0.4),
        ];

        assert_eq!(
            format_context_for_prompt(&results),
            "[From b.txt]: second source first\n\n[From a.txt]: first source second"
        );
        assert_eq!(format_context_for_prompt(&[]), "");
    }

    #[test]
    fn test_sources_deduplicated() {
        let results = vec![
            result("a.txt", "one", 0.9),
            result("b.txt", "two", 0.8),
            result("a.txt", "three", 0.7),
        ];

        let sources = collect_sources(&results);
        assert_eq!(sources.len(), 2);
        assert!(sources.contains("a.txt") && sources.contains("b.txt"));
    }
}
