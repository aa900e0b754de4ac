//! Multi-hop peeling stage
//!
//! Each laundering endpoint is walked through a randomized chain of normal
//! wallets, shrinking the carried amount every hop and pushing the carried
//! time forward so chains stay temporally causal.

use tracing::info;

use crate::config::LayeringConfig;
use crate::error::{Error, Result};
use crate::graph::ledger::TransactionLedger;
use crate::graph::universe::WalletUniverse;
use crate::model::StageCarrier;
use crate::rng::GeneratorRng;

/// Carried time advance per hop, in hours
const HOP_DELAY_HOURS: (f64, f64) = (1.0, 12.0);

pub struct LayeringGenerator<'a> {
    config: &'a LayeringConfig,
}

impl<'a> LayeringGenerator<'a> {
    pub fn new(config: &'a LayeringConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        universe: &WalletUniverse,
        endpoints: &[StageCarrier],
        ledger: &mut TransactionLedger,
        rng: &mut GeneratorRng,
    ) -> Result<Vec<StageCarrier>> {
        if !endpoints.is_empty() && universe.normal.is_empty() {
            return Err(Error::InsufficientPopulation {
                stage: "layering hops",
                needed: 1,
                available: 0,
            });
        }

        let mut outputs = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let hops = rng
                .choose(&self.config.hop_choices)
                .copied()
                .ok_or_else(|| Error::Config("layering.hop_choices must not be empty".into()))?;

            let mut current = endpoint.wallet;
            let mut amount = endpoint.amount;
            let mut timestamp = endpoint.timestamp;
            for _ in 0..hops {
                // The next hop is drawn from the full normal pool;
                // revisiting the current wallet is permitted (open question,
                // see DESIGN.md).
                let next = universe.normal[rng.index(universe.normal.len())];
                amount *= rng.uniform(self.config.decay_range.0, self.config.decay_range.1);
                timestamp = timestamp + rng.uniform_hours(HOP_DELAY_HOURS.0, HOP_DELAY_HOURS.1);
                ledger.emit(
                    universe.address(current),
                    universe.address(next),
                    amount,
                    timestamp,
                    rng,
                );
                current = next;
            }

            outputs.push(StageCarrier {
                wallet: current,
                amount,
                timestamp,
            });
        }

        info!(chains = endpoints.len(), "layering stage complete");
        Ok(outputs)
    }
}
