use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ragpilot::application::DEFAULT_LOCATION;
use ragpilot::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "ragpilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the document corpus
    #[arg(short, long, global = true, default_value = "./data")]
    data_dir: String,

    /// Run fully offline with mock models and an in-memory index
    #[arg(long, global = true)]
    mock: bool,

    /// Keep the vector index in memory instead of using the remote backend
    #[arg(long, global = true)]
    memory_index: bool,

    /// Location used when a weather question names none
    #[arg(long, global = true, default_value = DEFAULT_LOCATION)]
    location: String,

    /// How many chunks to retrieve per question
    #[arg(long, global = true, default_value = "4")]
    top_k: usize,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        data_dir: cli.data_dir,
        mock_mode: cli.mock,
        memory_index: cli.memory_index,
        default_location: cli.location,
        top_k: cli.top_k,
    })?;

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn parses_ask_with_session() {
        let cli = Cli::try_parse_from([
            "ragpilot",
            "ask",
            "what is the capital of France?",
            "--session",
            "abc-123",
        ])
        .expect("parse");
        match cli.command {
            Commands::Ask { question, session } => {
                assert_eq!(question, "what is the capital of France?");
                assert_eq!(session.as_deref(), Some("abc-123"));
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn ingest_defaults_to_non_forced() {
        let cli = Cli::try_parse_from(["ragpilot", "ingest"]).expect("parse");
        match cli.command {
            Commands::Ingest { force } => assert!(!force),
            _ => panic!("expected ingest command"),
        }
    }
}
