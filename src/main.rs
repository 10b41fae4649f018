//! Regscout CLI entry point.

use anyhow::Result;
use clap::Parser;
use regscout::cli::{commands, Cli, Commands};
use regscout::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("regscout={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_path = cli.config.as_ref().map(std::path::PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Ingest {
            profile,
            max_size,
            overlap,
        } => {
            commands::run_ingest(profile.as_deref(), *max_size, *overlap, settings).await?;
        }

        Commands::Ask { question, sources, k } => {
            commands::run_ask(question, sources, *k, settings).await?;
        }

        Commands::Search { query, sources, k } => {
            commands::run_search(query, sources, *k, settings).await?;
        }

        Commands::Chat { grounded } => {
            commands::run_chat(*grounded, settings).await?;
        }

        Commands::Documents => {
            commands::run_documents(settings)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_ref()).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path.as_ref())?;
        }
    }

    Ok(())
}
