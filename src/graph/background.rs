//! Uncorrelated background traffic
//!
//! Fills the remaining transaction budget with transfers between random
//! normal wallets until the run hits its configured target exactly.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::error::{Error, Result};
use crate::graph::ledger::TransactionLedger;
use crate::graph::universe::WalletUniverse;
use crate::rng::GeneratorRng;

/// Transfer value bounds for background activity
const AMOUNT_RANGE: (f64, f64) = (5.0, 300.0);

pub struct NormalTrafficFiller;

impl NormalTrafficFiller {
    pub fn run(
        universe: &WalletUniverse,
        window_start: DateTime<Utc>,
        window_days: u32,
        target: usize,
        ledger: &mut TransactionLedger,
        rng: &mut GeneratorRng,
    ) -> Result<usize> {
        if universe.normal.len() < 2 {
            return Err(Error::InsufficientPopulation {
                stage: "background traffic",
                needed: 2,
                available: universe.normal.len(),
            });
        }

        let window_seconds = f64::from(window_days) * 86_400.0;
        let mut emitted = 0;
        while ledger.len() < target {
            let pair = rng.sample_distinct("background pairs", &universe.normal, 2)?;
            let timestamp =
                window_start + Duration::seconds(rng.uniform(0.0, window_seconds) as i64);
            let amount = rng.uniform(AMOUNT_RANGE.0, AMOUNT_RANGE.1);
            ledger.emit(
                universe.address(pair[0]),
                universe.address(pair[1]),
                amount,
                timestamp,
                rng,
            );
            emitted += 1;
        }

        info!(emitted, total = ledger.len(), "background traffic filled");
        Ok(emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::universe::{WalletUniverse, WalletUniverseBuilder};
    use chrono::TimeZone;

    fn window_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn universe(wallet_count: usize, ratio: f64, seed: u64) -> WalletUniverse {
        let mut rng = GeneratorRng::new(Some(seed));
        WalletUniverseBuilder::new(wallet_count, ratio, window_start())
            .build(&mut rng)
            .unwrap()
    }

    #[test]
    fn test_fills_to_exact_target() {
        let universe = universe(20, 0.1, 1);
        let mut rng = GeneratorRng::new(Some(40));
        let mut ledger = TransactionLedger::new();

        let emitted =
            NormalTrafficFiller::run(&universe, window_start(), 100, 250, &mut ledger, &mut rng)
                .unwrap();
        assert_eq!(emitted, 250);
        assert_eq!(ledger.len(), 250);
    }

    #[test]
    fn test_no_self_transfers_and_bounds() {
        let universe = universe(20, 0.1, 2);
        let mut rng = GeneratorRng::new(Some(41));
        let mut ledger = TransactionLedger::new();

        NormalTrafficFiller::run(&universe, window_start(), 100, 300, &mut ledger, &mut rng)
            .unwrap();

        let window_end = window_start() + Duration::days(100);
        for tx in ledger.finalize() {
            assert_ne!(tx.from_address, tx.to_address);
            assert!((5.0..=300.0).contains(&tx.amount));
            assert!(tx.timestamp >= window_start());
            assert!(tx.timestamp <= window_end);
        }
    }

    #[test]
    fn test_noop_when_target_already_met() {
        let universe = universe(20, 0.1, 3);
        let mut rng = GeneratorRng::new(Some(42));
        let mut ledger = TransactionLedger::new();
        ledger.emit("0xaa", "0xbb", 10.0, window_start(), &mut rng);

        let emitted =
            NormalTrafficFiller::run(&universe, window_start(), 100, 1, &mut ledger, &mut rng)
                .unwrap();
        assert_eq!(emitted, 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_tiny_normal_pool_is_population_error() {
        let universe = universe(10, 0.9, 4);
        let mut rng = GeneratorRng::new(Some(43));
        let mut ledger = TransactionLedger::new();

        let err =
            NormalTrafficFiller::run(&universe, window_start(), 100, 50, &mut ledger, &mut rng)
                .unwrap_err();
        assert!(err.is_population_error());
    }
}
