//! Output table persistence
//!
//! The orchestrator hands the finished tables to a [`GraphStore`] exactly
//! once, after every stage has succeeded; a failed run never leaves partial
//! tables behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::SecondsFormat;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{Transaction, Wallet};

/// Persistence seam between the generator and external readers
pub trait GraphStore {
    /// Persist both tables as one handoff
    fn persist(&self, wallets: &[Wallet], transactions: &[Transaction]) -> Result<()>;
}

/// Writes `wallets.csv` and `transactions.csv` into a data directory
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn wallets_path(&self) -> PathBuf {
        self.data_dir.join("wallets.csv")
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join("transactions.csv")
    }
}

impl GraphStore for CsvStore {
    fn persist(&self, wallets: &[Wallet], transactions: &[Transaction]) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            Error::Persistence(format!("creating {}: {e}", self.data_dir.display()))
        })?;

        write_wallets(&self.wallets_path(), wallets)?;
        write_transactions(&self.transactions_path(), transactions)?;

        info!(
            wallets = wallets.len(),
            transactions = transactions.len(),
            dir = %self.data_dir.display(),
            "tables persisted"
        );
        Ok(())
    }
}

fn write_wallets(path: &Path, wallets: &[Wallet]) -> Result<()> {
    let file = fs::File::create(path)
        .map_err(|e| Error::Persistence(format!("creating {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "wallet_id,is_illicit_seed,first_seen,last_seen")?;
    for wallet in wallets {
        writeln!(
            writer,
            "{},{},{},{}",
            wallet.address,
            u8::from(wallet.is_illicit_seed),
            format_timestamp(&wallet.first_seen),
            format_timestamp(&wallet.last_seen),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let file = fs::File::create(path)
        .map_err(|e| Error::Persistence(format!("creating {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "tx_hash,from_address,to_address,amount,timestamp,block_number,gas_fee"
    )?;
    for tx in transactions {
        writeln!(
            writer,
            "{},{},{},{:.6},{},{},{:.6}",
            tx.tx_hash,
            tx.from_address,
            tx.to_address,
            tx.amount,
            format_timestamp(&tx.timestamp),
            tx.block_number,
            tx.gas_fee,
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Keeps the persisted tables in memory.
///
/// Used by tests and by embedders that consume the tables directly instead
/// of reading them back from disk.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Option<(Vec<Wallet>, Vec<Transaction>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables from the last successful persist, if any
    pub fn take(&self) -> Option<(Vec<Wallet>, Vec<Transaction>)> {
        self.tables.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl GraphStore for MemoryStore {
    fn persist(&self, wallets: &[Wallet], transactions: &[Transaction]) -> Result<()> {
        let mut guard = self
            .tables
            .lock()
            .map_err(|_| Error::Persistence("memory store lock poisoned".into()))?;
        *guard = Some((wallets.to_vec(), transactions.to_vec()));
        Ok(())
    }
}
