//! Document source: a directory of plain-text files.
//!
//! Each file is one document and its file name is the source identifier.

use crate::error::{RegscoutError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default category tag for ingested documents.
pub const DEFAULT_CATEGORY: &str = "regulation";

/// A raw document loaded for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source identifier (the file name).
    pub source_id: String,
    /// Category tag, e.g. "regulation".
    pub category: String,
    /// Full text content.
    pub text: String,
}

impl Document {
    pub fn new(source_id: &str, category: &str, text: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            category: category.to_string(),
            text: text.to_string(),
        }
    }
}

/// A directory of documents, optionally filtered by extension.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    dir: PathBuf,
    extensions: Vec<String>,
    category: String,
}

impl DocumentSource {
    /// Create a document source. An empty extension list accepts every file.
    pub fn new(dir: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            dir: dir.into(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Set the category tag applied to loaded documents.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List source identifiers, sorted by name.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| RegscoutError::DocumentRead {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RegscoutError::DocumentRead {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() || !self.accepts(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load every document, stopping at the first unreadable file.
    pub fn load_all(&self) -> Result<Vec<Document>> {
        self.list()?
            .into_iter()
            .map(|name| self.load(&name))
            .collect()
    }

    /// Load a single document by source identifier.
    pub fn load(&self, source_id: &str) -> Result<Document> {
        let path = self.dir.join(source_id);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| RegscoutError::DocumentRead { path: path.clone(), source: e })?;

        debug!("Loaded {} ({} bytes)", source_id, text.len());

        Ok(Document {
            source_id: source_id.to_string(),
            category: self.category.clone(),
            text,
        })
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}
