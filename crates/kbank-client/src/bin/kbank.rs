//! kbank: command-line diagnostics over the kbank API client.
//!
//! Prints the validated payload of one call as JSON, or the typed error.
//!
//! Environment variables:
//!   KBANK_API_URL           - backend address (default: http://127.0.0.1:8000)
//!   KBANK_API_TIMEOUT_SECS  - default per-call timeout (optional)
//!   LOG_FORMAT              - "json" or "text" (default: "text")
//!   RUST_LOG                - standard env filter (default: "kbank_client=info")

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kbank_client::ApiClient;
use kbank_core::{check_name, EntityKind, Listing};

#[derive(Parser)]
#[command(name = "kbank")]
#[command(author, version, about = "Query a kbank knowledge-bank backend")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List workspaces
    Workspaces,

    /// Search workspaces, threads and documents
    Search {
        /// Search text (at least 2 characters)
        query: String,

        /// Restrict threads and documents to one workspace
        #[arg(short, long)]
        workspace: Option<String>,
    },

    /// Show effective settings
    Settings {
        /// Include overrides of this workspace
        #[arg(short, long)]
        workspace: Option<String>,
    },

    /// List registered tools
    Tools,

    /// Check a name against the forbidden character set (no network)
    CheckName {
        /// Name to check
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kbank_client=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so stdout stays machine-readable.
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::CheckName { name } = &cli.command {
        check_name(name)?;
        println!("{:?} is a valid name", name);
        return Ok(());
    }

    let client = ApiClient::from_env()?;
    info!(base_path = %client.config().base_path(), "kbank client ready");

    match cli.command {
        Commands::Workspaces => print_listing(&client.workspaces().list().await?)?,
        Commands::Search { query, workspace } => {
            let outcome = client.search().global(&query, workspace.as_deref()).await?;
            print_json(&outcome.results)?;
            for diagnostic in &outcome.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            for kind in EntityKind::ALL {
                eprintln!("{}: {}", kind, outcome.results.get(kind).len());
            }
        }
        Commands::Settings { workspace } => {
            print_json(&client.settings().get(workspace.as_deref()).await?)?
        }
        Commands::Tools => print_listing(&client.tools().list().await?)?,
        Commands::CheckName { .. } => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_listing<T: Serialize>(listing: &Listing<T>) -> anyhow::Result<()> {
    print_json(listing)?;
    for row in &listing.diagnostics {
        eprintln!("warning: {}", row);
    }
    Ok(())
}
