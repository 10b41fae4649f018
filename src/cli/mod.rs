//! CLI module for Regscout.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Regscout - Retrieval-augmented answers over regulatory documents
///
/// Indexes a directory of plain-text regulations and answers questions
/// grounded in them, using a local Ollama server.
#[derive(Parser, Debug)]
#[command(name = "regscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "REGSCOUT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the index from the documents directory
    Ingest {
        /// Chunking profile to use (defaults to the configured profile)
        #[arg(short, long)]
        profile: Option<String>,

        /// Override the maximum chunk size in characters
        #[arg(long)]
        max_size: Option<usize>,

        /// Override the overlap between consecutive chunks in characters
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Ask a question grounded in the indexed documents
    Ask {
        /// The question to ask
        question: String,

        /// Restrict retrieval to these documents (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Number of chunks to retrieve
        #[arg(short)]
        k: Option<usize>,
    },

    /// Show the chunks most similar to a query
    Search {
        /// Search query
        query: String,

        /// Restrict results to these documents (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Number of results
        #[arg(short, default_value = "5")]
        k: usize,
    },

    /// Start an interactive chat session
    Chat {
        /// Ground every answer in the indexed documents
        #[arg(short, long)]
        grounded: bool,
    },

    /// List documents and their indexed chunk counts
    Documents,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration, documents, index and the Ollama server
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_sources() {
        let cli = Cli::parse_from([
            "regscout", "ask", "Who keeps records?", "--source", "A.txt", "-s", "B.txt", "-k", "3",
        ]);

        match cli.command {
            Commands::Ask { question, sources, k } => {
                assert_eq!(question, "Who keeps records?");
                assert_eq!(sources, vec!["A.txt", "B.txt"]);
                assert_eq!(k, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["regscout", "-vv", "ingest", "--profile", "fine"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Ingest { profile: Some(ref p), max_size: None, overlap: None } if p == "fine"
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
