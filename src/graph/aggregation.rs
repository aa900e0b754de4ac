//! Fan-in stage: layered outputs converge onto a few aggregator wallets

use tracing::info;

use crate::config::AggregationConfig;
use crate::error::Result;
use crate::graph::ledger::TransactionLedger;
use crate::graph::universe::WalletUniverse;
use crate::model::StageCarrier;
use crate::rng::GeneratorRng;

/// Value retained on the consolidation transfer
const AMOUNT_RETENTION: (f64, f64) = (0.97, 1.0);
/// Consolidation delay after the layered output, in hours
const INBOUND_DELAY_HOURS: (f64, f64) = (2.0, 24.0);

#[derive(Debug)]
pub struct AggregationOutcome {
    pub aggregator_count: usize,
}

pub struct AggregationGenerator<'a> {
    config: &'a AggregationConfig,
}

impl<'a> AggregationGenerator<'a> {
    pub fn new(config: &'a AggregationConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        universe: &WalletUniverse,
        layered: &[StageCarrier],
        ledger: &mut TransactionLedger,
        rng: &mut GeneratorRng,
    ) -> Result<AggregationOutcome> {
        let aggregator_count = ((layered.len() as f64 * self.config.fraction) as usize).max(2);
        let aggregators = rng.sample_distinct("aggregators", &universe.normal, aggregator_count)?;

        let indices: Vec<usize> = (0..layered.len()).collect();
        for &aggregator in &aggregators {
            let inbound =
                rng.int_range(self.config.fanin_range.0, self.config.fanin_range.1) as usize;
            // Without replacement within this aggregator's draw; the pool is
            // reused across aggregators, so one layered output can feed
            // several of them (open question, see DESIGN.md).
            let picks = rng.sample_distinct("aggregation inbound", &indices, inbound)?;

            for pick in picks {
                let source = &layered[pick];
                let amount = source.amount * rng.uniform(AMOUNT_RETENTION.0, AMOUNT_RETENTION.1);
                let timestamp = source.timestamp
                    + rng.uniform_hours(INBOUND_DELAY_HOURS.0, INBOUND_DELAY_HOURS.1);
                ledger.emit(
                    universe.address(source.wallet),
                    universe.address(aggregator),
                    amount,
                    timestamp,
                    rng,
                );
            }
        }

        info!(aggregators = aggregators.len(), "aggregation stage complete");
        Ok(AggregationOutcome {
            aggregator_count: aggregators.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::universe::{WalletUniverse, WalletUniverseBuilder};
    use chrono::{DateTime, TimeZone, Utc};

    fn window_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn universe(wallet_count: usize, ratio: f64, seed: u64) -> WalletUniverse {
        let mut rng = GeneratorRng::new(Some(seed));
        WalletUniverseBuilder::new(wallet_count, ratio, window_start())
            .build(&mut rng)
            .unwrap()
    }

    fn layered_outputs(universe: &WalletUniverse, count: usize) -> Vec<StageCarrier> {
        (0..count)
            .map(|i| StageCarrier {
                wallet: universe.normal[i % universe.normal.len()],
                amount: 500.0 + i as f64,
                timestamp: window_start() + chrono::Duration::days(40),
            })
            .collect()
    }

    #[test]
    fn test_aggregator_count_formula() {
        let universe = universe(200, 0.1, 1);
        let mut rng = GeneratorRng::new(Some(30));
        let mut ledger = TransactionLedger::new();

        // floor(105 / 10) = 10 aggregators
        let outcome = AggregationGenerator::new(&AggregationConfig::default())
            .run(&universe, &layered_outputs(&universe, 105), &mut ledger, &mut rng)
            .unwrap();
        assert_eq!(outcome.aggregator_count, 10);
    }

    #[test]
    fn test_aggregator_count_floor_is_two() {
        let universe = universe(200, 0.1, 2);
        let mut rng = GeneratorRng::new(Some(31));
        let mut ledger = TransactionLedger::new();

        let outcome = AggregationGenerator::new(&AggregationConfig::default())
            .run(&universe, &layered_outputs(&universe, 15), &mut ledger, &mut rng)
            .unwrap();
        assert_eq!(outcome.aggregator_count, 2);
    }

    #[test]
    fn test_fanin_bounds_and_timing() {
        let universe = universe(200, 0.1, 3);
        let mut rng = GeneratorRng::new(Some(32));
        let mut ledger = TransactionLedger::new();
        let layered = layered_outputs(&universe, 50);

        let outcome = AggregationGenerator::new(&AggregationConfig::default())
            .run(&universe, &layered, &mut ledger, &mut rng)
            .unwrap();
        let txs = ledger.finalize();

        assert!(txs.len() >= outcome.aggregator_count * 4);
        assert!(txs.len() <= outcome.aggregator_count * 10);

        let earliest_source = layered[0].timestamp;
        let max_amount = layered.iter().map(|c| c.amount).fold(0.0_f64, f64::max);
        for tx in &txs {
            assert!(tx.amount > 0.0);
            assert!(tx.amount <= max_amount);
            assert!(tx.timestamp >= earliest_source + chrono::Duration::hours(2));
        }
    }

    #[test]
    fn test_small_layered_pool_is_population_error() {
        let universe = universe(200, 0.1, 4);
        let mut rng = GeneratorRng::new(Some(33));
        let mut ledger = TransactionLedger::new();

        // 3 layered outputs cannot satisfy a fan-in of at least 4
        let err = AggregationGenerator::new(&AggregationConfig::default())
            .run(&universe, &layered_outputs(&universe, 3), &mut ledger, &mut rng)
            .unwrap_err();
        assert!(err.is_population_error());
    }

    #[test]
    fn test_small_normal_pool_is_population_error() {
        let universe = universe(10, 0.9, 5);
        assert_eq!(universe.normal.len(), 1);
        let mut rng = GeneratorRng::new(Some(34));
        let mut ledger = TransactionLedger::new();

        let layered = vec![StageCarrier {
            wallet: universe.normal[0],
            amount: 100.0,
            timestamp: window_start(),
        }];
        let err = AggregationGenerator::new(&AggregationConfig::default())
            .run(&universe, &layered, &mut ledger, &mut rng)
            .unwrap_err();
        assert!(err.is_population_error());
    }
}
