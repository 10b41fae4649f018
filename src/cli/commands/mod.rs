//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod documents;
mod ingest;
mod search;
mod serve;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use documents::run_documents;
pub use ingest::run_ingest;
pub use search::run_search;
pub use serve::{router, run_serve};

use std::collections::HashSet;

/// Turn repeated `--source` flags into a retrieval restriction.
///
/// No flags means every document is eligible.
pub(crate) fn source_filter(sources: &[String]) -> Option<HashSet<String>> {
    if sources.is_empty() {
        None
    } else {
        Some(sources.iter().cloned().collect())
    }
}
