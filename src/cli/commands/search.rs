//! Search command implementation.

use super::source_filter;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, sources: &[String], k: usize, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let retriever = orchestrator.retriever();
    let allowed = source_filter(sources);

    let spinner = Output::spinner("Searching...");
    let results = retriever.retrieve(query, allowed.as_ref(), k).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", results.len()));

                for result in &results {
                    Output::search_result(&result.chunk.source_id, result.score, &result.chunk.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
