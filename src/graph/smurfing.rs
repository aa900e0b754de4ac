//! Fan-out stage: illicit sources disperse value across many receivers

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::SmurfingConfig;
use crate::error::Result;
use crate::graph::ledger::TransactionLedger;
use crate::graph::universe::WalletUniverse;
use crate::model::StageCarrier;
use crate::rng::GeneratorRng;

/// Total dispersed value per source, before the per-transfer jitter
const TOTAL_VALUE_RANGE: (f64, f64) = (4_000.0, 15_000.0);
/// Per-transfer amount jitter around the even split
const AMOUNT_JITTER: (f64, f64) = (0.95, 1.05);
/// Batch activation offset from the window start, in days
const ACTIVATION_DAYS: (f64, f64) = (20.0, 50.0);
/// Per-transfer offset from batch activation, in minutes
const TRANSFER_OFFSET_MINUTES: (f64, f64) = (1.0, 120.0);

/// Laundering endpoints produced by the fan-out stage
#[derive(Debug)]
pub struct SmurfingOutcome {
    /// One endpoint per emitted transfer, carrying the batch activation time
    pub endpoints: Vec<StageCarrier>,
    pub source_count: usize,
}

pub struct SmurfingGenerator<'a> {
    config: &'a SmurfingConfig,
}

impl<'a> SmurfingGenerator<'a> {
    pub fn new(config: &'a SmurfingConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        universe: &WalletUniverse,
        window_start: DateTime<Utc>,
        ledger: &mut TransactionLedger,
        rng: &mut GeneratorRng,
    ) -> Result<SmurfingOutcome> {
        let source_count =
            ((universe.illicit.len() as f64 * self.config.source_fraction) as usize).max(1);
        let sources = rng.sample_distinct("smurf sources", &universe.illicit, source_count)?;

        let mut endpoints = Vec::new();
        for &source in &sources {
            let fanout =
                rng.int_range(self.config.fanout_range.0, self.config.fanout_range.1) as usize;
            let receivers = rng.sample_distinct("smurf receivers", &universe.normal, fanout)?;

            let total_value = rng.uniform(TOTAL_VALUE_RANGE.0, TOTAL_VALUE_RANGE.1);
            let base_amount = total_value / fanout as f64;
            let activation =
                window_start + rng.uniform_days(ACTIVATION_DAYS.0, ACTIVATION_DAYS.1);

            for &receiver in &receivers {
                let amount = base_amount * rng.uniform(AMOUNT_JITTER.0, AMOUNT_JITTER.1);
                let timestamp = activation
                    + rng.uniform_minutes(TRANSFER_OFFSET_MINUTES.0, TRANSFER_OFFSET_MINUTES.1);
                ledger.emit(
                    universe.address(source),
                    universe.address(receiver),
                    amount,
                    timestamp,
                    rng,
                );
                // The endpoint deliberately carries the batch activation
                // time, not the transfer's own timestamp.
                endpoints.push(StageCarrier {
                    wallet: receiver,
                    amount,
                    timestamp: activation,
                });
            }

            debug!(
                source = universe.address(source),
                fanout, total_value, "smurf batch emitted"
            );
        }

        info!(
            sources = sources.len(),
            endpoints = endpoints.len(),
            "smurfing stage complete"
        );
        Ok(SmurfingOutcome {
            endpoints,
            source_count: sources.len(),
        })
    }
}
