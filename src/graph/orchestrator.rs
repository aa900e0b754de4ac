//! Stage sequencing and run summary

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::aggregation::AggregationGenerator;
use crate::graph::background::NormalTrafficFiller;
use crate::graph::layering::LayeringGenerator;
use crate::graph::ledger::TransactionLedger;
use crate::graph::smurfing::SmurfingGenerator;
use crate::graph::universe::WalletUniverseBuilder;
use crate::rng::GeneratorRng;
use crate::storage::GraphStore;

/// Counters reported after a successful run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub wallet_count: usize,
    pub transaction_count: usize,
    pub illicit_seed_count: usize,
    pub smurf_source_count: usize,
    pub aggregator_count: usize,
    pub time_window_days: u32,
}

/// Sequences the generation stages and hands the finished tables to the
/// storage collaborator.
///
/// A run either completes as a whole or fails before anything is persisted;
/// a failed run is restarted, never resumed.
pub struct Orchestrator {
    config: Config,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full pipeline: wallets → smurfing → layering → aggregation →
    /// background filler → ledger finalize → persist.
    pub fn generate<S: GraphStore>(
        &self,
        rng: &mut GeneratorRng,
        store: &S,
    ) -> Result<GenerationSummary> {
        let generator = &self.config.generator;
        let wallet_count = rng.int_range(
            generator.wallet_count_range.0,
            generator.wallet_count_range.1,
        ) as usize;
        let target = rng.int_range(
            generator.transaction_count_target_range.0,
            generator.transaction_count_target_range.1,
        ) as usize;
        let illicit_ratio = rng.uniform(
            generator.illicit_ratio_range.0,
            generator.illicit_ratio_range.1,
        );
        let window_start = self.window_start();

        info!(
            wallet_count,
            transaction_target = target,
            illicit_ratio,
            "starting generation run"
        );

        let universe =
            WalletUniverseBuilder::new(wallet_count, illicit_ratio, window_start).build(rng)?;

        let mut ledger = TransactionLedger::new();
        let smurfing = SmurfingGenerator::new(&self.config.smurfing).run(
            &universe,
            window_start,
            &mut ledger,
            rng,
        )?;
        let layered = LayeringGenerator::new(&self.config.layering).run(
            &universe,
            &smurfing.endpoints,
            &mut ledger,
            rng,
        )?;
        let aggregation = AggregationGenerator::new(&self.config.aggregation).run(
            &universe,
            &layered,
            &mut ledger,
            rng,
        )?;

        if ledger.len() > target {
            return Err(Error::Config(format!(
                "transaction target {} is below the {} laundering transactions already emitted",
                target,
                ledger.len()
            )));
        }
        NormalTrafficFiller::run(
            &universe,
            window_start,
            generator.time_window_days,
            target,
            &mut ledger,
            rng,
        )?;

        let transactions = ledger.finalize();
        store.persist(&universe.wallets, &transactions)?;

        let summary = GenerationSummary {
            wallet_count: universe.wallets.len(),
            transaction_count: transactions.len(),
            illicit_seed_count: universe.illicit.len(),
            smurf_source_count: smurfing.source_count,
            aggregator_count: aggregation.aggregator_count,
            time_window_days: generator.time_window_days,
        };
        info!(
            wallets = summary.wallet_count,
            transactions = summary.transaction_count,
            illicit_seeds = summary.illicit_seed_count,
            smurf_sources = summary.smurf_source_count,
            aggregators = summary.aggregator_count,
            "generation run complete"
        );
        Ok(summary)
    }

    fn window_start(&self) -> DateTime<Utc> {
        match self.config.generator.start_date {
            Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
            None => Utc::now() - Duration::days(i64::from(self.config.generator.time_window_days)),
        }
    }
}
