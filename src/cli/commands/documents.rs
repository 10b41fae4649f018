//! Documents command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::RegscoutError;
use crate::index::VectorIndex;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::collections::HashMap;

/// Run the documents command.
pub fn run_documents(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let source = orchestrator.document_source();

    let documents = match source.list() {
        Ok(documents) => documents,
        Err(e) => {
            Output::error(&format!("Failed to list documents: {}", e));
            return Err(e.into());
        }
    };

    let index = match VectorIndex::load(orchestrator.index_path()) {
        Ok(index) => Some(index),
        Err(RegscoutError::IndexNotFound(_)) => None,
        Err(e) => {
            Output::warning(&format!("Could not read index: {}", e));
            None
        }
    };

    let counts: HashMap<String, usize> = index
        .as_ref()
        .map(|index| {
            index
                .sources()
                .into_iter()
                .map(|s| (s.source_id, s.chunk_count))
                .collect()
        })
        .unwrap_or_default();

    if documents.is_empty() {
        Output::info(&format!(
            "No documents found. Add .txt files to {}",
            source.dir().display()
        ));
    } else {
        Output::header(&format!("Documents ({})", documents.len()));
        println!();

        for document in &documents {
            Output::document_info(document, counts.get(document).copied());
        }
    }

    println!();
    match &index {
        Some(index) => {
            Output::kv("Indexed chunks", &index.len().to_string());
            Output::kv("Embedding model", index.embedding_model());
            Output::kv("Built at", &index.built_at().format("%Y-%m-%d %H:%M:%S UTC").to_string());

            let stale = counts.keys().filter(|id| !documents.contains(*id)).count();
            if stale > 0 {
                Output::warning(&format!(
                    "{} indexed documents are no longer in the documents directory. Run 'regscout ingest'.",
                    stale
                ));
            }
        }
        None => Output::info("No index yet. Run 'regscout ingest' to build it."),
    }

    Ok(())
}
