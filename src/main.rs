//! chaingen - synthetic transaction graph generator
//!
//! Builds a labeled wallet population, injects laundering patterns and
//! background traffic, and writes the wallet/transaction tables consumed by
//! the fraud-model training pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

// Use the library crate
use chaingen::cli::commands;
use chaingen::config::Config;

/// Synthetic transaction graph generator
#[derive(Parser)]
#[command(name = "chaingen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a labeled wallet/transaction dataset
    Generate {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the CSV tables (overrides config)
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chaingen=info".parse()?),
        )
        .with_target(true)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Generate { seed, data_dir } => commands::generate(&config, seed, data_dir),
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        error!("Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
