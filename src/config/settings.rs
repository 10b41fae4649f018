//! Configuration settings for Regscout.

use crate::chunking::ChunkConfig;
use crate::error::{RegscoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ollama: OllamaSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory holding the source documents.
    pub documents_dir: String,
    /// Location of the persisted vector index.
    pub index_path: String,
    /// File extensions accepted as documents. Empty accepts every file.
    pub extensions: Vec<String>,
    /// Category tag applied to ingested documents.
    pub category: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.regscout".to_string(),
            documents_dir: "~/.regscout/documents".to_string(),
            index_path: "~/.regscout/index.db".to_string(),
            extensions: vec!["txt".to_string()],
            category: crate::documents::DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Ollama server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: crate::ollama::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 300,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: crate::embedding::DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// LLM model for response generation.
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: crate::generation::DEFAULT_GENERATION_MODEL.to_string(),
        }
    }
}

/// Content chunking settings.
///
/// Named profiles hold `(max_size, overlap)` pairs; `profile` picks the one
/// used by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Active profile name.
    pub profile: String,
    /// Available profiles.
    pub profiles: BTreeMap<String, ChunkConfig>,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "standard".to_string(),
            ChunkConfig {
                max_size: 1000,
                overlap: 200,
            },
        );
        profiles.insert(
            "fine".to_string(),
            ChunkConfig {
                max_size: 500,
                overlap: 50,
            },
        );

        Self {
            profile: "standard".to_string(),
            profiles,
        }
    }
}

impl ChunkingSettings {
    /// Resolve a profile by name, or the active profile when `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<ChunkConfig> {
        let name = name.unwrap_or(self.profile.as_str());
        let config = self.profiles.get(name).copied().ok_or_else(|| {
            RegscoutError::InvalidConfig(format!(
                "Unknown chunking profile '{}' (available: {})",
                name,
                self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks retrieved per question.
    pub k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { k: 5 }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origin of the web client allowed by CORS. Any origin when unset.
    pub client_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            client_url: None,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RegscoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("regscout")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded documents directory path.
    pub fn documents_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.documents_dir)
    }

    /// Get the expanded index path.
    pub fn index_path(&self) -> PathBuf {
        Self::expand_path(&self.general.index_path)
    }
}
