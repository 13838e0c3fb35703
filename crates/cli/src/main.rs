//! MongoMart CLI - database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Create the catalog schema
//! mongomart-cli migrate
//!
//! # Load items from a YAML file
//! mongomart-cli seed crates/cli/data/items.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert or refresh catalog items from YAML

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mongomart-cli")]
#[command(author, version, about = "MongoMart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert or refresh catalog items from a YAML file
    Seed {
        /// Path to the YAML item list
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::items(&file).await?,
    }
    Ok(())
}
