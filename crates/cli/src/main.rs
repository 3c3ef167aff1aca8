//! Bazaar CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bazaar migrate
//!
//! # Load catalog items from a YAML file
//! bazaar seed items catalog.yaml
//!
//! # Validate the file without touching the database
//! bazaar seed items catalog.yaml --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed items` - Insert catalog items

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert catalog items from a YAML list of {name, price, category, photo}
    Items {
        /// Path to the YAML file
        path: PathBuf,

        /// Parse and validate only
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Items { path, dry_run } => commands::seed::items(&path, dry_run).await?,
        },
    }
    Ok(())
}
