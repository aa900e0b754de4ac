//! Transaction identity assignment and final ordering

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::model::{round_6dp, Transaction};
use crate::rng::GeneratorRng;

/// Gas fee as a fraction of the transferred amount
const GAS_FEE_RANGE: (f64, f64) = (0.001, 0.003);

/// Collects transactions as the stages emit them.
///
/// Exclusively owns the block counter: one increment per emitted
/// transaction in stage emission order, independent of the transaction's
/// timestamp.
pub struct TransactionLedger {
    transactions: Vec<Transaction>,
    next_block: u64,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_block: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Record one transfer, assigning block number, hash and gas fee
    pub fn emit(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
        timestamp: DateTime<Utc>,
        rng: &mut GeneratorRng,
    ) {
        let block_number = self.next_block;
        self.next_block += 1;

        let amount = round_6dp(amount);
        let gas_fee = round_6dp(amount * rng.uniform(GAS_FEE_RANGE.0, GAS_FEE_RANGE.1));

        self.transactions.push(Transaction {
            tx_hash: tx_hash(block_number, from, to, amount, timestamp),
            from_address: from.to_string(),
            to_address: to.to_string(),
            amount,
            timestamp,
            block_number,
            gas_fee,
        });
    }

    /// Stable ascending sort by timestamp.
    ///
    /// Block numbers keep their emission-order values, so persisted block
    /// numbers and timestamps may appear out of step.
    pub fn finalize(mut self) -> Vec<Transaction> {
        self.transactions.sort_by_key(|tx| tx.timestamp);
        self.transactions
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash over the block number and transfer fields. The counter is unique
/// within a run, so the digest is too.
fn tx_hash(block_number: u64, from: &str, to: &str, amount: f64, timestamp: DateTime<Utc>) -> String {
    let micros = timestamp.timestamp_micros();
    let preimage = format!("{block_number}:{from}:{to}:{amount:.6}:{micros}");
    let digest = Sha256::digest(preimage.as_bytes());
    format!("0x{}", hex::encode(digest))
}
