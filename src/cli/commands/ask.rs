//! Ask command implementation.

use super::source_filter;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::RegscoutError;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    sources: &[String],
    k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let engine = orchestrator.rag_engine(k);
    let allowed = source_filter(sources);

    let spinner = Output::spinner("Searching documents...");
    let result = engine.ask(question, allowed.as_ref()).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            println!("\n{}\n", answer.answer);

            if answer.sources.is_empty() {
                Output::warning("No matching excerpts were found; the answer is not grounded.");
            } else {
                Output::header("Sources");
                for source in &answer.sources {
                    Output::list_item(source);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            if matches!(e, RegscoutError::IndexNotFound(_)) {
                Output::info("Run 'regscout ingest' to build the index.");
            }
            return Err(e.into());
        }
    }

    Ok(())
}
