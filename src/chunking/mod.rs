//! Content chunking for breaking documents into searchable segments.
//!
//! Documents are split into overlapping, bounded-length windows. Every chunk
//! records where it came from so that retrieval results can be cited.

mod splitter;

pub use splitter::TextSplitter;

use crate::error::{RegscoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key holding the source identifier of a chunk.
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the category tag of a chunk.
pub const CATEGORY_KEY: &str = "type";

/// A segment of a document's text with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// Identifier of the document this chunk was cut from (its file name).
    pub source_id: String,
    /// Free-form metadata; always carries `source`.
    pub metadata: BTreeMap<String, String>,
    /// Character offset of the first character in the source text.
    pub start: usize,
    /// Character offset one past the last character in the source text.
    pub end: usize,
}

impl Chunk {
    /// Length of this chunk in characters.
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    /// Look up a metadata value.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Window size and overlap for splitting, both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum chunk length.
    pub max_size: usize,
    /// Number of characters shared by consecutive chunks.
    pub overlap: usize,
}

impl ChunkConfig {
    /// Create a validated chunk configuration.
    pub fn new(max_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { max_size, overlap };
        config.validate()?;
        Ok(config)
    }

    /// Check `max_size > 0` and `overlap < max_size`.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(RegscoutError::InvalidConfig(
                "max_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.max_size {
            return Err(RegscoutError::InvalidConfig(format!(
                "overlap ({}) must be smaller than max_size ({})",
                self.overlap, self.max_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            overlap: 200,
        }
    }
}

/// Split `text` into overlapping chunks attributed to `source_id`.
pub fn split(text: &str, source_id: &str, max_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    let splitter = TextSplitter::new(ChunkConfig::new(max_size, overlap)?)?;
    Ok(splitter.split(text, source_id))
}
