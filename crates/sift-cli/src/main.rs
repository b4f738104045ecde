use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sift_core::DeckEngine;
use sift_core::metrics::{DeckMetrics, LoggingMetricsBackend};
use sift_tracker::SiftConfig;
use tracing_subscriber::{EnvFilter, fmt};

mod deck;
mod session;

use session::{LoggingObserver, Session};

#[derive(Parser)]
#[command(name = "sift", about = "SIFT — keep or discard a deck of content, one card at a time")]
struct Cli {
    /// Path to the config file (defaults to ~/.sift/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit metrics as log events
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play through a deck, reading commands from stdin
    Play {
        /// JSON array of content items
        #[arg(long)]
        deck: PathBuf,
    },
    /// Validate a deck file without playing it
    Check {
        #[arg(long)]
        deck: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only command replies
    fmt()
        .with_env_filter(EnvFilter::from_env("SIFT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { deck } => {
            let items = deck::load_deck(&deck)?;
            let external = items.iter().filter(|i| i.is_external()).count();
            println!("{}: {} items ({external} external)", deck.display(), items.len());
        }
        Command::Play { deck } => {
            let config = SiftConfig::load(cli.config.as_deref())?;
            let items = deck::load_deck(&deck)?;

            let metrics = if cli.metrics {
                Arc::new(DeckMetrics::with_backend(Arc::new(LoggingMetricsBackend)))
            } else {
                Arc::new(DeckMetrics::new())
            };

            let engine = DeckEngine::builder(items)
                .config(config.engine.clone())
                .gesture(config.gesture.clone())
                .reporter(config.build_reporter()?)
                .observer(Arc::new(LoggingObserver))
                .metrics(metrics)
                .build();

            tracing::info!(
                session = engine.session_id(),
                deck = %deck.display(),
                "Starting deck session"
            );

            let session = Session::new(engine, config.engine.exit_duration());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session.run(stdin).await?;

            tracing::info!("Deck session finished");
        }
    }

    Ok(())
}
