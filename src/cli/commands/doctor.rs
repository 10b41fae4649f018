//! Doctor command - verify configuration, documents, index and Ollama.

use crate::cli::Output;
use crate::config::Settings;
use crate::documents::DocumentSource;
use crate::error::RegscoutError;
use crate::index::VectorIndex;
use crate::ollama::OllamaClient;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Regscout Doctor");
    println!();
    println!("Checking configuration, documents and services...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![check_config_file(config_path), check_chunking(settings)];
    print_all(&config_checks);
    checks.extend(config_checks);

    println!();

    println!("{}", style("Documents").bold());
    let document_check = check_documents(settings);
    document_check.print();
    checks.push(document_check);

    let index_check = check_index(settings);
    index_check.print();
    checks.push(index_check);

    println!();

    println!("{}", style("Ollama").bold());
    let ollama_check = check_ollama(settings).await;
    ollama_check.print();
    checks.push(ollama_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Regscout.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Regscout is ready to use.");
    }

    Ok(())
}

fn print_all(checks: &[CheckResult]) {
    for check in checks {
        check.print();
    }
}

fn check_config_file(config_path: Option<&PathBuf>) -> CheckResult {
    let path = config_path.cloned().unwrap_or_else(Settings::default_config_path);
    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: regscout config init",
        )
    }
}

fn check_chunking(settings: &Settings) -> CheckResult {
    match settings.chunking.resolve(None) {
        Ok(config) => CheckResult::ok(
            "Chunking profile",
            &format!(
                "{} ({} chars, {} overlap)",
                settings.chunking.profile, config.max_size, config.overlap
            ),
        ),
        Err(e) => CheckResult::error(
            "Chunking profile",
            &e.to_string(),
            "Overlap must be smaller than max_size, and the profile must exist",
        ),
    }
}

fn check_documents(settings: &Settings) -> CheckResult {
    let source = DocumentSource::new(settings.documents_dir(), &settings.general.extensions);
    let dir = source.dir().display().to_string();

    match source.list() {
        Ok(documents) if documents.is_empty() => CheckResult::warning(
            "Documents",
            &format!("{} (empty)", dir),
            "Add plain-text regulation files, then run: regscout ingest",
        ),
        Ok(documents) => CheckResult::ok(
            "Documents",
            &format!("{} ({} files)", dir, documents.len()),
        ),
        Err(e) => CheckResult::error(
            "Documents",
            &e.to_string(),
            &format!("Create the directory: mkdir -p {}", dir),
        ),
    }
}

fn check_index(settings: &Settings) -> CheckResult {
    let path = settings.index_path();

    match VectorIndex::load(&path) {
        Ok(index) if index.embedding_model() != settings.embedding.model => CheckResult::warning(
            "Index",
            &format!(
                "{} chunks built with '{}'",
                index.len(),
                index.embedding_model()
            ),
            &format!(
                "Queries use '{}'. Re-run: regscout ingest",
                settings.embedding.model
            ),
        ),
        Ok(index) => CheckResult::ok(
            "Index",
            &format!(
                "{} ({} chunks, dimension {}, {})",
                path.display(),
                index.len(),
                index.dimension(),
                format_size(std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0))
            ),
        ),
        Err(RegscoutError::IndexNotFound(_)) => CheckResult::warning(
            "Index",
            &format!("{} (not created yet)", path.display()),
            "Build it with: regscout ingest",
        ),
        Err(e) => CheckResult::error("Index", &e.to_string(), "Rebuild it with: regscout ingest"),
    }
}

async fn check_ollama(settings: &Settings) -> CheckResult {
    let client = match OllamaClient::with_timeout(&settings.ollama.base_url, Duration::from_secs(5)) {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::error("Server", &e.to_string(), "Fix ollama.base_url in the config file")
        }
    };

    match client.ping().await {
        Ok(()) => CheckResult::ok(
            "Server",
            &format!(
                "{} (embedding: {}, generation: {})",
                client.base_url(),
                settings.embedding.model,
                settings.generation.model
            ),
        ),
        Err(e) => CheckResult::error(
            "Server",
            &e,
            "Start Ollama with: ollama serve (and pull the configured models)",
        ),
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
