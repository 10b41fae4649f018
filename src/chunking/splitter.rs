//! Overlapping character-window splitter.
//!
//! Slides a window of `max_size` characters across the text. Inside each
//! window the cut is placed after the strongest available boundary
//! (paragraph, line, sentence, word) and falls back to a hard cut. The next
//! window starts `overlap` characters before the previous cut.

use super::{Chunk, ChunkConfig, CATEGORY_KEY, SOURCE_KEY};
use crate::documents::Document;
use crate::error::Result;
use std::collections::BTreeMap;

/// Boundaries tried in order of preference.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", " "];

/// Deterministic overlapping text splitter.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: ChunkConfig,
}

impl TextSplitter {
    pub fn new(config: ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkConfig {
        self.config
    }

    /// Split a loaded document, tagging chunks with its source and category.
    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        let mut metadata = BTreeMap::new();
        metadata.insert(SOURCE_KEY.to_string(), document.source_id.clone());
        metadata.insert(CATEGORY_KEY.to_string(), document.category.clone());
        self.split_with_metadata(&document.text, &document.source_id, &metadata)
    }

    /// Split raw text attributed to `source_id`.
    pub fn split(&self, text: &str, source_id: &str) -> Vec<Chunk> {
        let mut metadata = BTreeMap::new();
        metadata.insert(SOURCE_KEY.to_string(), source_id.to_string());
        self.split_with_metadata(text, source_id, &metadata)
    }

    fn split_with_metadata(
        &self,
        text: &str,
        source_id: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();

        if chars.is_empty() {
            return chunks;
        }

        let mut start = 0;
        loop {
            let window_end = (start + self.config.max_size).min(chars.len());
            let end = if window_end == chars.len() {
                window_end
            } else {
                self.find_break(&chars, start, window_end)
            };

            chunks.push(Chunk {
                text: chars[start..end].iter().collect(),
                source_id: source_id.to_string(),
                metadata: metadata.clone(),
                start,
                end,
            });

            if end == chars.len() {
                break;
            }
            start = end - self.config.overlap;
        }

        chunks
    }

    /// Find the cut position for the window `[start, window_end)`.
    ///
    /// A boundary is only accepted past `start + overlap` so the next window
    /// always starts after the current one.
    fn find_break(&self, chars: &[char], start: usize, window_end: usize) -> usize {
        let min_cut = start + self.config.overlap + 1;

        for sep in SEPARATORS {
            let sep: Vec<char> = sep.chars().collect();
            let lowest = min_cut.max(start + sep.len());
            let found = (lowest..=window_end)
                .rev()
                .find(|&cut| chars[cut - sep.len()..cut] == sep[..]);
            if let Some(cut) = found {
                return cut;
            }
        }

        window_end
    }
}
