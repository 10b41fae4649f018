//! Grounded prompt composition and answer generation.

use super::{collect_sources, format_context_for_prompt, Answer};
use crate::config::Prompts;
use crate::error::Result;
use crate::generation::Generator;
use crate::index::SearchResult;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Builds prompts from retrieved chunks and invokes the language model.
pub struct AnswerComposer {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl AnswerComposer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Build the grounded prompt for `question` over `results`.
    pub fn grounded_prompt(&self, question: &str, results: &[SearchResult]) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context_for_prompt(results));
        vars.insert("question".to_string(), question.to_string());
        self.prompts.render_with_custom(&self.prompts.rag.template, &vars)
    }

    /// Answer `question` using only the supplied results as context.
    ///
    /// An empty result list still produces a prompt and a model call.
    #[instrument(skip(self, results), fields(question = %question, results = results.len()))]
    pub async fn compose(&self, question: &str, results: &[SearchResult]) -> Result<Answer> {
        let prompt = self.grounded_prompt(question, results);
        debug!("Grounded prompt is {} characters", prompt.len());

        let answer = self.generator.generate(&prompt).await?;
        let sources = collect_sources(results);

        info!("Answered with {} sources", sources.len());

        Ok(Answer { answer, sources })
    }

    /// Answer `question` without retrieval.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn answer_general(&self, question: &str) -> Result<Answer> {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.general.template, &vars);

        let answer = self.generator.generate(&prompt).await?;

        Ok(Answer {
            answer,
            sources: BTreeSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegscoutError;
    use crate::index::tests::entry;
    use crate::test_support::{FailingGenerator, RecordingGenerator};

    fn result(source: &str, text: &str) -> SearchResult {
        SearchResult {
            chunk: entry(source, text, vec![1.0]).chunk,
            score: 0.5,
        }
    }

    #[tokio::test]
    async fn test_compose_grounded_answer() {
        let generator = Arc::new(RecordingGenerator::new("Grass is green [A.txt]."));
        let composer = AnswerComposer::new(generator.clone());

        let results = vec![
            result("A.txt", "Grass is green."),
            result("B.txt", "Water boils at 100C."),
            result("A.txt", "The sky is blue."),
        ];
        let answer = composer.compose("What color is grass?", &results).await.unwrap();

        assert_eq!(answer.answer, "Grass is green [A.txt].");
        assert_eq!(
            answer.sources,
            ["A.txt", "B.txt"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        );

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("answer strictly based on"));
        assert!(prompt.contains("Question: What color is grass?"));
        assert!(prompt.contains("cite"));
        let first = prompt.find("[From A.txt]: Grass is green.").unwrap();
        let second = prompt.find("[From B.txt]: Water boils").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_compose_with_no_results() {
        let generator = Arc::new(RecordingGenerator::new("I cannot tell."));
        let composer = AnswerComposer::new(generator.clone());

        let answer = composer.compose("Anything?", &[]).await.unwrap();

        assert_eq!(answer.answer, "I cannot tell.");
        assert!(answer.sources.is_empty());
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_general_answer_has_no_sources() {
        let generator = Arc::new(RecordingGenerator::new("Paris."));
        let composer = AnswerComposer::new(generator.clone());

        let answer = composer.answer_general("Capital of France?").await.unwrap();

        assert_eq!(answer.answer, "Paris.");
        assert!(answer.sources.is_empty());
        assert!(generator.last_prompt().unwrap().contains("Capital of France?"));
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let composer = AnswerComposer::new(Arc::new(FailingGenerator));
        assert!(matches!(
            composer.compose("q", &[result("A.txt", "x")]).await,
            Err(RegscoutError::GenerationService(_))
        ));
    }
}
