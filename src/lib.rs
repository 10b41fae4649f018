//! Regscout - Retrieval-augmented answers over regulatory documents
//!
//! A local-first tool that indexes a directory of plain-text regulations and
//! answers questions grounded in them, using a locally hosted Ollama server
//! for embeddings and generation.
//!
//! # Overview
//!
//! Regscout allows you to:
//! - Split documents into overlapping chunks and embed them
//! - Persist the embedded chunks as a single-file vector index
//! - Retrieve the most similar chunks for a question, optionally per document
//! - Compose an answer that cites the documents it was grounded on
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `documents` - Document directory access
//! - `chunking` - Overlapping text splitter
//! - `embedding` - Embedding generation
//! - `index` - Vector index with atomic persistence
//! - `ingest` - Documents to index pipeline
//! - `retrieval` - Query-time search
//! - `rag` - Answer composition
//! - `orchestrator` - Component wiring from settings
//!
//! # Example
//!
//! ```rust,no_run
//! use regscout::config::Settings;
//! use regscout::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     orchestrator.ingest(None).await?;
//!
//!     let answer = orchestrator
//!         .rag_engine(None)
//!         .ask("Which operators must keep records?", None)
//!         .await?;
//!     println!("{} ({:?})", answer.answer, answer.sources);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingest;
pub mod ollama;
pub mod orchestrator;
pub mod rag;
pub mod retrieval;

#[cfg(test)]
mod test_support;

pub use error::{RegscoutError, Result};
