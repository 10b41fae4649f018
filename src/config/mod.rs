//! Configuration module for Regscout.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{GeneralPrompts, Prompts, RagPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, OllamaSettings,
    PromptSettings, RetrievalSettings, ServerSettings, Settings,
};
