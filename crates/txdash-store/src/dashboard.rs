//! Dashboard state: the current transaction snapshot and its source

use chrono::{DateTime, Utc};
use txdash_core::{
    filter_and_sort, query, to_csv, CoreError, CoreResult, CreateTransactionRequest, QueryParams,
    QueryView, StatusCounts, Transaction,
};

use crate::error::StoreResult;
use crate::source::TransactionSourceRef;

/// Holds the last fetched snapshot; all queries read from it
pub struct Dashboard {
    source: TransactionSourceRef,
    transactions: Vec<Transaction>,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl Dashboard {
    /// Create with an empty snapshot; call [`Dashboard::load`] to fetch
    pub fn new(source: TransactionSourceRef) -> Self {
        Self {
            source,
            transactions: Vec::new(),
            loaded_at: None,
            last_error: None,
        }
    }

    /// Fetch the full set and replace the snapshot.
    ///
    /// On failure the previous snapshot stays and the error is kept for the
    /// retry banner.
    pub async fn load(&mut self) -> StoreResult<usize> {
        match self.source.fetch_all().await {
            Ok(transactions) => {
                self.transactions = transactions;
                self.loaded_at = Some(Utc::now());
                self.last_error = None;
                log::info!("Loaded {} transactions", self.transactions.len());
                Ok(self.transactions.len())
            }
            Err(e) => {
                log::error!("Failed to load transactions: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn reload(&mut self) -> StoreResult<usize> {
        self.load().await
    }

    /// Validate and submit a new transaction, then refresh the snapshot
    pub async fn create(&mut self, request: &CreateTransactionRequest) -> StoreResult<Transaction> {
        let new_tx = request.validate()?;
        let created = self.source.create(new_tx).await.map_err(|e| {
            log::error!("Failed to create transaction: {}", e);
            e
        })?;

        if let Err(e) = self.reload().await {
            log::warn!("Reload after create failed, keeping local copy: {}", e);
            self.transactions.push(created.clone());
        }
        Ok(created)
    }

    /// One page of the snapshot for the given parameters
    pub fn query(&self, params: &QueryParams) -> QueryView {
        query(&self.transactions, params)
    }

    /// CSV of every row matching `params` (all pages)
    pub fn export_csv(&self, params: &QueryParams) -> CoreResult<String> {
        to_csv(filter_and_sort(&self.transactions, params))
    }

    pub fn transaction(&self, id: &str) -> CoreResult<&Transaction> {
        self.transactions
            .iter()
            .find(|tx| tx.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.transactions)
    }

    /// Number of transactions before any filtering
    pub fn raw_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Message of the last failed fetch, cleared by a successful one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
