//! Configuration loading and validation

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub smurfing: SmurfingConfig,
    #[serde(default)]
    pub layering: LayeringConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Population and run-level knobs
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Bounds for the randomized wallet population size
    #[serde(default = "default_wallet_count_range")]
    pub wallet_count_range: (u64, u64),

    /// Bounds for the randomized transaction budget
    #[serde(default = "default_transaction_target_range")]
    pub transaction_count_target_range: (u64, u64),

    /// Bounds for the randomized illicit-seed ratio
    #[serde(default = "default_illicit_ratio_range")]
    pub illicit_ratio_range: (f64, f64),

    /// Length of the simulated time window
    #[serde(default = "default_time_window_days")]
    pub time_window_days: u32,

    /// Pin the window start for reproducible runs; unset anchors to now
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Fan-out stage knobs
#[derive(Debug, Clone, Deserialize)]
pub struct SmurfingConfig {
    /// Fraction of illicit seeds acting as smurf sources
    #[serde(default = "default_source_fraction")]
    pub source_fraction: f64,

    /// Receivers per smurf batch
    #[serde(default = "default_fanout_range")]
    pub fanout_range: (u64, u64),
}

/// Multi-hop peeling stage knobs
#[derive(Debug, Clone, Deserialize)]
pub struct LayeringConfig {
    /// Chain lengths drawn uniformly per laundering endpoint
    #[serde(default = "default_hop_choices")]
    pub hop_choices: Vec<u32>,

    /// Per-hop value retention factor
    #[serde(default = "default_decay_range")]
    pub decay_range: (f64, f64),
}

/// Fan-in stage knobs
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Aggregators as a fraction of the layered-output count
    #[serde(default = "default_aggregation_fraction")]
    pub fraction: f64,

    /// Inbound transfers per aggregator
    #[serde(default = "default_fanin_range")]
    pub fanin_range: (u64, u64),
}

/// Output table location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving wallets.csv and transactions.csv
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

// Default value functions
fn default_wallet_count_range() -> (u64, u64) {
    (800, 1500)
}

fn default_transaction_target_range() -> (u64, u64) {
    (4000, 7000)
}

fn default_illicit_ratio_range() -> (f64, f64) {
    (0.05, 0.10)
}

fn default_time_window_days() -> u32 {
    100
}

fn default_source_fraction() -> f64 {
    0.125
}

fn default_fanout_range() -> (u64, u64) {
    (6, 15)
}

fn default_hop_choices() -> Vec<u32> {
    vec![2, 3, 4]
}

fn default_decay_range() -> (f64, f64) {
    (0.95, 0.99)
}

fn default_aggregation_fraction() -> f64 {
    0.1
}

fn default_fanin_range() -> (u64, u64) {
    (4, 10)
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            wallet_count_range: default_wallet_count_range(),
            transaction_count_target_range: default_transaction_target_range(),
            illicit_ratio_range: default_illicit_ratio_range(),
            time_window_days: default_time_window_days(),
            start_date: None,
        }
    }
}

impl Default for SmurfingConfig {
    fn default() -> Self {
        Self {
            source_fraction: default_source_fraction(),
            fanout_range: default_fanout_range(),
        }
    }
}

impl Default for LayeringConfig {
    fn default() -> Self {
        Self {
            hop_choices: default_hop_choices(),
            decay_range: default_decay_range(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            fraction: default_aggregation_fraction(),
            fanin_range: default_fanin_range(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            smurfing: SmurfingConfig::default(),
            layering: LayeringConfig::default(),
            aggregation: AggregationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix CHAINGEN_)
            .add_source(
                config::Environment::with_prefix("CHAINGEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        check_count_range("wallet_count_range", self.generator.wallet_count_range)?;
        check_count_range(
            "transaction_count_target_range",
            self.generator.transaction_count_target_range,
        )?;

        let (ratio_lo, ratio_hi) = self.generator.illicit_ratio_range;
        if !(0.0..=1.0).contains(&ratio_lo) || !(0.0..=1.0).contains(&ratio_hi) {
            anyhow::bail!("illicit_ratio_range must lie within [0, 1]");
        }
        if ratio_lo > ratio_hi {
            anyhow::bail!("illicit_ratio_range is inverted: {ratio_lo} > {ratio_hi}");
        }

        if self.generator.time_window_days == 0 {
            anyhow::bail!("time_window_days must be positive");
        }

        check_fraction("smurfing.source_fraction", self.smurfing.source_fraction)?;
        check_count_range("smurfing.fanout_range", self.smurfing.fanout_range)?;

        if self.layering.hop_choices.is_empty() {
            anyhow::bail!("layering.hop_choices must not be empty");
        }
        if self.layering.hop_choices.iter().any(|&h| h == 0) {
            anyhow::bail!("layering.hop_choices must be at least 1");
        }

        let (decay_lo, decay_hi) = self.layering.decay_range;
        if decay_lo <= 0.0 || decay_hi >= 1.0 {
            anyhow::bail!("layering.decay_range must lie strictly within (0, 1)");
        }
        if decay_lo > decay_hi {
            anyhow::bail!("layering.decay_range is inverted: {decay_lo} > {decay_hi}");
        }

        check_fraction("aggregation.fraction", self.aggregation.fraction)?;
        check_count_range("aggregation.fanin_range", self.aggregation.fanin_range)?;

        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage.data_dir must not be empty");
        }

        Ok(())
    }

    /// Get configuration for display
    pub fn display(&self) -> String {
        format!(
            r#"Configuration:
  Generator:
    wallet_count_range: [{}, {}]
    transaction_count_target_range: [{}, {}]
    illicit_ratio_range: [{}, {}]
    time_window_days: {}
    start_date: {}
  Smurfing:
    source_fraction: {}
    fanout_range: [{}, {}]
  Layering:
    hop_choices: {:?}
    decay_range: [{}, {}]
  Aggregation:
    fraction: {}
    fanin_range: [{}, {}]
  Storage:
    data_dir: {}
"#,
            self.generator.wallet_count_range.0,
            self.generator.wallet_count_range.1,
            self.generator.transaction_count_target_range.0,
            self.generator.transaction_count_target_range.1,
            self.generator.illicit_ratio_range.0,
            self.generator.illicit_ratio_range.1,
            self.generator.time_window_days,
            self.generator
                .start_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "(now - window)".to_string()),
            self.smurfing.source_fraction,
            self.smurfing.fanout_range.0,
            self.smurfing.fanout_range.1,
            self.layering.hop_choices,
            self.layering.decay_range.0,
            self.layering.decay_range.1,
            self.aggregation.fraction,
            self.aggregation.fanin_range.0,
            self.aggregation.fanin_range.1,
            self.storage.data_dir,
        )
    }
}

fn check_count_range(name: &str, range: (u64, u64)) -> Result<()> {
    if range.0 == 0 {
        anyhow::bail!("{name} lower bound must be positive");
    }
    if range.0 > range.1 {
        anyhow::bail!("{name} is inverted: {} > {}", range.0, range.1);
    }
    Ok(())
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if value <= 0.0 || value > 1.0 {
        anyhow::bail!("{name} must lie within (0, 1], got {value}");
    }
    Ok(())
}
