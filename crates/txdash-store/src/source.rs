//! Transaction data sources

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use txdash_config::DataConfig;
use txdash_core::{NewTransaction, Transaction, TransactionStatus};

use crate::error::{StoreError, StoreResult};

/// Source reference type
pub type TransactionSourceRef = Arc<dyn TransactionSource>;

/// Where the dashboard gets its transactions from
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the complete transaction set
    async fn fetch_all(&self) -> StoreResult<Vec<Transaction>>;

    /// Submit a validated transaction and return the stored record
    async fn create(&self, new_tx: NewTransaction) -> StoreResult<Transaction>;
}

/// Generate a `0x`-prefixed 64 hex character hash from content
pub fn generate_hash(content: &str) -> String {
    let mut hash = String::with_capacity(66);
    hash.push_str("0x");
    for round in 0u8..4 {
        let mut hasher = DefaultHasher::new();
        round.hash(&mut hasher);
        content.hash(&mut hasher);
        hash.push_str(&format!("{:016x}", hasher.finish()));
    }
    hash
}

/// Transactions kept as a JSON array on disk
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    sender_address: String,
    write_lock: Mutex<()>,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>, sender_address: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sender_address: sender_address.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.transactions_file, config.sender_address.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw JSON records; a missing file is an empty set
    async fn read_records(&self) -> StoreResult<Vec<serde_json::Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Source {
                message: format!("{} is not a JSON array of transactions: {}", self.path.display(), e),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Transaction file {} not found, starting empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(StoreError::Source {
                message: format!("Failed to read {}: {}", self.path.display(), e),
            }),
        }
    }

    async fn write_records(&self, records: &[serde_json::Value]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(records)?;
        let write = async {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            tokio::fs::write(&self.path, content).await
        };
        write.await.map_err(|e| StoreError::Source {
            message: format!("Failed to write {}: {}", self.path.display(), e),
        })
    }
}

#[async_trait]
impl TransactionSource for JsonFileSource {
    async fn fetch_all(&self) -> StoreResult<Vec<Transaction>> {
        let records = self.read_records().await?;
        let total = records.len();

        let transactions: Vec<Transaction> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    log::warn!("Skipping malformed transaction record #{}: {}", index, e);
                    None
                }
            })
            .collect();

        log::debug!(
            "Loaded {} of {} transaction records from {}",
            transactions.len(),
            total,
            self.path.display()
        );
        Ok(transactions)
    }

    async fn create(&self, new_tx: NewTransaction) -> StoreResult<Transaction> {
        let _guard = self.write_lock.lock().await;

        let id = txdash_utils::generate_id();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let hash = generate_hash(&format!(
            "{}:{}:{}:{}:{}",
            id, self.sender_address, new_tx.to_address, new_tx.amount, timestamp
        ));

        let tx = Transaction {
            id,
            hash,
            from_address: self.sender_address.clone(),
            to_address: new_tx.to_address,
            amount: new_tx.amount,
            status: TransactionStatus::Pending,
            gas_limit: Some(new_tx.gas_limit),
            gas_price: Some(new_tx.gas_price),
            timestamp,
        };

        let mut records = self.read_records().await?;
        records.push(serde_json::to_value(&tx)?);
        self.write_records(&records).await?;

        log::info!("Created transaction {} ({} to {})", tx.id, tx.amount, tx.to_address);
        Ok(tx)
    }
}
