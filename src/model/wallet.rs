//! Wallet records
//!
//! Wallets are created once by the universe builder and never mutated by
//! the generator afterwards; labeling happens at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A participant in the synthetic transaction graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Opaque unique identifier (0x-prefixed hex)
    pub address: String,

    /// Pre-labeled origin of laundering activity
    pub is_illicit_seed: bool,

    /// Start of the active lifetime window
    pub first_seen: DateTime<Utc>,

    /// End of the active lifetime window
    pub last_seen: DateTime<Utc>,
}

impl Wallet {
    /// Active lifetime as fractional days
    pub fn lifetime_days(&self) -> f64 {
        (self.last_seen - self.first_seen).num_seconds() as f64 / 86_400.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lifetime_days() {
        let first_seen = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let wallet = Wallet {
            address: "0x00".to_string(),
            is_illicit_seed: false,
            first_seen,
            last_seen: first_seen + chrono::Duration::days(30),
        };
        assert_eq!(wallet.lifetime_days(), 30.0);
    }
}
