//! Wallet population construction

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{Error, Result};
use crate::model::Wallet;
use crate::rng::GeneratorRng;

/// Wallet birth offset from the window start, in days
const BIRTH_SPREAD_DAYS: (f64, f64) = (0.0, 60.0);
/// Lifetime of an illicit seed, in days ("burn after use")
const SEED_LIFETIME_DAYS: (f64, f64) = (5.0, 25.0);
/// Lifetime of a normal wallet, in days
const NORMAL_LIFETIME_DAYS: (f64, f64) = (30.0, 100.0);

/// The generated wallet population with label-partitioned index lists
#[derive(Debug, Clone)]
pub struct WalletUniverse {
    pub wallets: Vec<Wallet>,

    /// Indices of illicit-seed wallets
    pub illicit: Vec<usize>,

    /// Indices of non-seed wallets
    pub normal: Vec<usize>,
}

impl WalletUniverse {
    pub fn address(&self, idx: usize) -> &str {
        &self.wallets[idx].address
    }
}

/// Builds the wallet universe: unique addresses, illicit-seed labeling and
/// lifetime windows.
pub struct WalletUniverseBuilder {
    wallet_count: usize,
    illicit_ratio: f64,
    window_start: DateTime<Utc>,
}

impl WalletUniverseBuilder {
    pub fn new(wallet_count: usize, illicit_ratio: f64, window_start: DateTime<Utc>) -> Self {
        Self {
            wallet_count,
            illicit_ratio,
            window_start,
        }
    }

    pub fn build(&self, rng: &mut GeneratorRng) -> Result<WalletUniverse> {
        let illicit_count = (self.wallet_count as f64 * self.illicit_ratio).round() as usize;
        if illicit_count == 0 {
            return Err(Error::Config(format!(
                "illicit ratio {} yields no illicit wallets for a population of {}",
                self.illicit_ratio, self.wallet_count
            )));
        }

        // The table contract requires unique identifiers; regenerate on the
        // vanishingly rare collision.
        let mut seen = HashSet::with_capacity(self.wallet_count);
        let mut addresses = Vec::with_capacity(self.wallet_count);
        while addresses.len() < self.wallet_count {
            let address = rng.address();
            if seen.insert(address.clone()) {
                addresses.push(address);
            }
        }

        let indices: Vec<usize> = (0..self.wallet_count).collect();
        let illicit_set: HashSet<usize> = rng
            .sample_distinct("illicit seeds", &indices, illicit_count)?
            .into_iter()
            .collect();

        let mut wallets = Vec::with_capacity(self.wallet_count);
        let mut illicit = Vec::with_capacity(illicit_count);
        let mut normal = Vec::with_capacity(self.wallet_count - illicit_count);
        for (idx, address) in addresses.into_iter().enumerate() {
            let is_illicit_seed = illicit_set.contains(&idx);
            let lifetime = if is_illicit_seed {
                SEED_LIFETIME_DAYS
            } else {
                NORMAL_LIFETIME_DAYS
            };

            let first_seen =
                self.window_start + rng.uniform_days(BIRTH_SPREAD_DAYS.0, BIRTH_SPREAD_DAYS.1);
            let last_seen = first_seen + rng.uniform_days(lifetime.0, lifetime.1);

            if is_illicit_seed {
                illicit.push(idx);
            } else {
                normal.push(idx);
            }
            wallets.push(Wallet {
                address,
                is_illicit_seed,
                first_seen,
                last_seen,
            });
        }

        info!(
            wallets = wallets.len(),
            illicit_seeds = illicit.len(),
            "wallet universe built"
        );
        Ok(WalletUniverse {
            wallets,
            illicit,
            normal,
        })
    }
}
