//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
///
/// `config_path` is the `--config` override; the default location is used
/// when it is absent.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: Option<&PathBuf>) -> Result<()> {
    let path = config_path.cloned().unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", path.display());
        }

        ConfigAction::Init { force } => {
            if path.exists() && !force {
                Output::warning(&format!("Config already exists at {}", path.display()));
                Output::info("Use --force to overwrite it.");
                return Ok(());
            }

            settings.save_to(&path)?;
            std::fs::create_dir_all(settings.documents_dir())?;

            Output::success(&format!("Wrote config to {}", path.display()));
            Output::kv("Documents", &settings.documents_dir().display().to_string());
            Output::kv("Index", &settings.index_path().display().to_string());
        }
    }

    Ok(())
}
