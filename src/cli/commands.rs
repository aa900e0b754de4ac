//! Command handlers for the chaingen binary

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;
use crate::graph::Orchestrator;
use crate::rng::GeneratorRng;
use crate::storage::CsvStore;

/// Run a full generation and persist the tables
pub fn generate(config: &Config, seed: Option<u64>, data_dir: Option<String>) -> Result<()> {
    let dir = data_dir.unwrap_or_else(|| config.storage.data_dir.clone());
    let store = CsvStore::new(&dir);
    let mut rng = GeneratorRng::new(seed);

    if let Some(seed) = seed {
        info!(seed, "running with fixed seed");
    }

    let summary = match Orchestrator::new(config.clone()).generate(&mut rng, &store) {
        Ok(summary) => summary,
        Err(e) => {
            if e.is_population_error() {
                error!("{e}; raise wallet_count_range or lower the fan-out/fan-in settings");
            }
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Print the effective configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.display());
    Ok(())
}
