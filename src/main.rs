mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pinfetch::prelude::*;
use pinfetch::server;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let cfg = ProviderConfig::load(cli.config.as_deref())?;
    tracing::debug!(?cfg, "loaded provider config");
    let source = RapidApiSource::new(&cfg)?;

    match cli.command {
        Commands::Info { url, json } => {
            let Some(outcome) = fetch_or_report(PinFetcher::new(source), &url).await else {
                return Ok(ExitCode::FAILURE);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.pin)?);
            } else {
                print_pin(&outcome.pin);
            }
            if let Some(w) = outcome.warning {
                eprintln!("{w}");
            }
        }
        Commands::Download { url, out } => {
            let Some(outcome) = fetch_or_report(PinFetcher::new(source), &url).await else {
                return Ok(ExitCode::FAILURE);
            };
            if let Some(w) = outcome.warning {
                eprintln!("{w}");
                return Ok(ExitCode::SUCCESS);
            }
            let saver = MediaSaver::new()?;
            for result in saver.save_all(&outcome.pin, &out).await {
                match result {
                    SaveOutcome::Saved { path, bytes } => {
                        println!("Saved {} ({} bytes)", path.display(), bytes)
                    }
                    SaveOutcome::Fallback { url } => {
                        println!("Could not download, open manually: {url}")
                    }
                }
            }
        }
        Commands::Serve { addr } => {
            server::serve(addr, Arc::new(source)).await?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// Every request error ends here and becomes a one-line message.
async fn fetch_or_report(fetcher: PinFetcher, url: &str) -> Option<FetchOutcome> {
    match fetcher.fetch(url).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            eprintln!("{e}");
            if e.is_retryable() {
                eprintln!("Please wait a moment before trying again.");
            }
            None
        }
    }
}

fn print_pin(pin: &PinResult) {
    let id = if pin.id.is_empty() { "-" } else { pin.id.as_str() };
    println!("{} (id: {})", pin.title, id);
    if let Some(author) = &pin.author {
        println!("by {}", author.name);
    }
    if !pin.description.is_empty() {
        println!("{}", pin.description);
    }
    for (i, m) in pin.media().enumerate() {
        let size = match (m.width, m.height) {
            (Some(w), Some(h)) => format!(" {w}x{h}"),
            _ => String::new(),
        };
        println!("{:>3}. [{:?}]{} {}", i + 1, m.kind, size, m.url);
    }
}
