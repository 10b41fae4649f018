//! Retrieval plus composition for a single question.

use super::{Answer, AnswerComposer};
use crate::error::Result;
use crate::retrieval::Retriever;
use std::collections::HashSet;
use tracing::{info, instrument};

/// RAG engine for question answering.
pub struct RagEngine {
    retriever: Retriever,
    composer: AnswerComposer,
    k: usize,
}

impl RagEngine {
    pub fn new(retriever: Retriever, composer: AnswerComposer, k: usize) -> Self {
        Self {
            retriever,
            composer,
            k,
        }
    }

    /// Ask a question grounded in the indexed documents.
    ///
    /// Retrieval failures are returned as errors; there is no fallback to an
    /// ungrounded answer.
    #[instrument(skip(self, allowed_sources), fields(question = %question))]
    pub async fn ask(&self, question: &str, allowed_sources: Option<&HashSet<String>>) -> Result<Answer> {
        info!("Processing question: {}", question);

        let results = self.retriever.retrieve(question, allowed_sources, self.k).await?;
        self.composer.compose(question, &results).await
    }

    /// Ask a question without retrieval.
    pub async fn ask_general(&self, question: &str) -> Result<Answer> {
        self.composer.answer_general(question).await
    }
}
