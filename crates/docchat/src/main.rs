//! Command-line interface: ingest a path, then ask questions
//!
//! One-shot: docchat ./docs -q "What is the refund policy?"
//! Interactive: docchat ./docs

use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use docchat::config::DocChatConfig;
use docchat::pipeline::RagPipeline;
use docchat::providers::AzureOpenAi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docchat", about = "Ask questions about your documents", version)]
struct Cli {
    /// File or directory to ingest
    source: PathBuf,

    /// Ask one question and exit instead of starting the interactive session
    #[arg(short, long)]
    question: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = DocChatConfig::from_env()?;
    let azure = Arc::new(AzureOpenAi::new(config.azure.clone())?);
    let pipeline = RagPipeline::new(config, azure.clone(), azure)?;

    println!("Loading documents from {}...", cli.source.display());
    let report = pipeline.ingest(&cli.source).await?;
    for warning in &report.warnings {
        eprintln!("warning: skipped {}: {}", warning.source, warning.reason);
    }
    println!(
        "Loaded {} document(s) into {} chunk(s).",
        report.document_count, report.chunk_count
    );

    if let Some(question) = cli.question {
        let answer = pipeline.ask(&question).await?;
        println!("\n{answer}");
        return Ok(());
    }

    interactive_session(&pipeline).await
}

/// Read questions from stdin until EOF or an exit command
async fn interactive_session(pipeline: &RagPipeline) -> anyhow::Result<()> {
    println!("\nAsk a question, or type 'exit' to quit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match pipeline.ask(question).await {
            Ok(answer) => println!("\n{answer}\n"),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    println!("Goodbye.");
    Ok(())
}
