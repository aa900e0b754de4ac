//! Transaction records and inter-stage carriers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single transfer between two wallets.
///
/// Immutable once emitted by the ledger; the only later operation is the
/// final stable sort of the whole collection by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique hash identifier (0x-prefixed hex)
    pub tx_hash: String,

    /// Sending wallet address
    pub from_address: String,

    /// Receiving wallet address
    pub to_address: String,

    /// Transferred value, rounded to 6 decimals
    pub amount: f64,

    /// When the transfer happened
    pub timestamp: DateTime<Utc>,

    /// Emission-order sequence number, independent of `timestamp`
    pub block_number: u64,

    /// Fee proportional to `amount`, rounded to 6 decimals
    pub gas_fee: f64,
}

/// Transient value/time tuple handed from one laundering stage to the next.
///
/// Smurfing produces these as laundering endpoints; layering consumes them
/// and re-emits layered outputs for aggregation. Never persisted.
#[derive(Debug, Clone, Copy)]
pub struct StageCarrier {
    /// Index into the wallet universe
    pub wallet: usize,

    /// Carried value
    pub amount: f64,

    /// Carried time
    pub timestamp: DateTime<Utc>,
}

/// Round to the 6-decimal precision of the persisted tables
pub fn round_6dp(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_6dp() {
        assert_eq!(round_6dp(1.23456789), 1.234568);
        assert_eq!(round_6dp(1.2345644), 1.234564);
        assert_eq!(round_6dp(1000.0), 1000.0);
    }

    #[test]
    fn test_round_6dp_is_monotone() {
        let a = 987.654321;
        let b = a * 0.99;
        assert!(round_6dp(b) < round_6dp(a));
    }
}
