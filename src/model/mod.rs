//! Domain records shared across the pipeline

mod transaction;
mod wallet;

pub use transaction::{round_6dp, StageCarrier, Transaction};
pub use wallet::Wallet;
