//! Pattern Vault - Main Server
//!
//! PARA notes, connections and daily reflection prompts over Neo4j.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pattern_vault::prompts::{select_prompt, PromptManager};
use pattern_vault::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pattern-vault")]
#[command(about = "PARA knowledge vault server")]
struct Cli {
    /// Path to a YAML config file (default: ./config.yaml)
    #[arg(short, long, global = true, env = "VAULT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides config and SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the daily prompt question for a date
    Prompt {
        /// Day as YYYY-MM-DD (default: today, UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pattern_vault=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;
            if let Some(port) = port {
                config.server_port = port;
            }
            pattern_vault::start_server(config).await
        }
        Commands::Prompt { date } => {
            let date = date.unwrap_or_else(PromptManager::today);
            println!("{}: {}", date, select_prompt(date));
            Ok(())
        }
    }
}
