//! Ingest command implementation.

use crate::chunking::ChunkConfig;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ingest command.
///
/// `max_size` and `overlap` override the corresponding values of the selected
/// profile.
pub async fn run_ingest(
    profile: Option<&str>,
    max_size: Option<usize>,
    overlap: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let base = settings.chunking.resolve(profile)?;
    let chunk_config = ChunkConfig::new(
        max_size.unwrap_or(base.max_size),
        overlap.unwrap_or(base.overlap),
    )?;

    let orchestrator = Orchestrator::new(settings)?;
    let documents_dir = orchestrator.document_source().dir().to_path_buf();

    Output::info(&format!(
        "Indexing {} (chunks of {} chars, {} overlap)",
        documents_dir.display(),
        chunk_config.max_size,
        chunk_config.overlap
    ));

    let spinner = Output::spinner("Embedding chunks...");
    let result = orchestrator.ingest_with(chunk_config).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            Output::success(&format!(
                "Indexed {} documents as {} chunks",
                report.documents, report.chunks
            ));
            Output::kv("Index", &orchestrator.index_path().display().to_string());
            Output::kv("Dimension", &report.dimension.to_string());
            if report.documents == 0 {
                Output::warning(&format!(
                    "No documents found. Add .txt files to {}",
                    documents_dir.display()
                ));
            }
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            Output::info("The previous index, if any, was left in place.");
            return Err(e.into());
        }
    }

    Ok(())
}
