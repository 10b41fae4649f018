//! Interactive chat command.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::{Answer, RagEngine};
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
///
/// Every line is answered independently; no conversation history is kept.
pub async fn run_chat(grounded: bool, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let engine = orchestrator.rag_engine(None);

    let mode = if grounded { "grounded" } else { "general" };
    println!("\n{}", style(format!("Regscout Chat ({})", mode)).bold().cyan());
    println!("{}\n", style("Type your questions, or 'exit' to quit.").dim());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        match answer(&engine, input, grounded).await {
            Ok(answer) => {
                println!("\n{} {}", style("Regscout:").cyan().bold(), answer.answer);
                if !answer.sources.is_empty() {
                    let sources: Vec<&str> = answer.sources.iter().map(String::as_str).collect();
                    println!("{}", style(format!("Sources: {}", sources.join(", "))).dim());
                }
                println!();
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

async fn answer(engine: &RagEngine, question: &str, grounded: bool) -> crate::error::Result<Answer> {
    if grounded {
        engine.ask(question, None).await
    } else {
        engine.ask_general(question).await
    }
}
