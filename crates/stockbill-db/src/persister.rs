//! # Persister
//!
//! The only writer of the sheets. Wraps a [`SheetStore`] with retry and
//! remembers how the last write went.
//!
//! ## Retry Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   attempt ──► Ok ──────────────────────────► record success, return    │
//! │      │                                                                  │
//! │      └──► Err                                                           │
//! │             │                                                           │
//! │             ├── retryable + backoff has time ──► sleep ──► attempt     │
//! │             │                                                           │
//! │             └── otherwise ──► PersistenceFailed, record error, return  │
//! │                                                                         │
//! │   Backoff: 200ms, ~400ms, ~800ms ... until max_elapsed (default 10s)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Health
//! A failed write does not take the service down. The ledgers keep serving
//! reads from memory and `/api/health` reports `degraded` until a write
//! succeeds again.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use stockbill_core::{Invoice, InvoiceLedger, StockLedger};

use crate::codec;
use crate::error::{DbError, DbResult};
use crate::sheets::{Row, Sheet, SheetStore};

// =============================================================================
// Retry Policy
// =============================================================================

/// How hard to try before giving up on a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// First delay between attempts.
    pub initial_interval: Duration,

    /// Cap on a single delay.
    pub max_interval: Duration,

    /// Total time budget across all attempts.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            initial_interval: Duration::from_millis(200),
            max_interval: Duration::from_secs(2),
            max_elapsed: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        RetryPolicy {
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            max_elapsed: Duration::ZERO,
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            current_interval: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: 2.0,
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Outcome of recent sheet operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceHealth {
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub failed_operations: u64,
}

impl PersistenceHealth {
    /// True while the most recent operation failed.
    pub fn is_degraded(&self) -> bool {
        match (self.last_error_at, self.last_success_at) {
            (Some(failed), Some(succeeded)) => failed > succeeded,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

// =============================================================================
// Persister
// =============================================================================

/// Retrying front for a sheet store.
///
/// ## Usage
/// ```rust,ignore
/// let persister = Persister::new(Arc::new(db.sheets()), RetryPolicy::default());
/// let (stock, invoices) = persister.load().await?;
/// persister.save_stock(&stock).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Persister {
    store: Arc<dyn SheetStore>,
    retry: RetryPolicy,
    health: Arc<RwLock<PersistenceHealth>>,
}

impl Persister {
    pub fn new(store: Arc<dyn SheetStore>, retry: RetryPolicy) -> Self {
        Persister {
            store,
            retry,
            health: Arc::new(RwLock::new(PersistenceHealth::default())),
        }
    }

    /// Reads both sheets and rebuilds the ledgers.
    ///
    /// Stock is loaded first because invoice lines take their GST and HSN
    /// from it.
    pub async fn load(&self) -> DbResult<(StockLedger, InvoiceLedger)> {
        let stock_rows: Vec<Row> = self.list(Sheet::Stock).await?.into_iter().flatten().collect();
        let stock = StockLedger::restore(codec::stock_from_rows(&stock_rows));

        let invoice_batches = self.list(Sheet::Invoices).await?;
        let invoices =
            InvoiceLedger::restore(codec::invoices_from_batches(&invoice_batches, &stock));

        info!(
            stock_items = stock.len(),
            invoices = invoices.len(),
            "Ledgers loaded from sheets"
        );
        Ok((stock, invoices))
    }

    /// Rewrites the whole stock sheet.
    pub async fn save_stock(&self, stock: &StockLedger) -> DbResult<()> {
        let rows: Vec<Row> = stock.list().iter().map(codec::stock_to_row).collect();
        let store = &self.store;
        let rows = &rows;
        self.run("replace Stock", move || store.replace_all(Sheet::Stock, rows))
            .await
    }

    /// Appends one row per invoice line.
    pub async fn append_invoice(&self, invoice: &Invoice) -> DbResult<()> {
        let rows = codec::invoice_rows(invoice);
        let store = &self.store;
        let rows = &rows;
        self.run("append Invoices", move || {
            store.append_rows(Sheet::Invoices, rows)
        })
        .await
    }

    /// Snapshot of the health record.
    pub async fn health(&self) -> PersistenceHealth {
        self.health.read().await.clone()
    }

    /// Whether the store answers right now. One try, no retry.
    pub async fn is_reachable(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Sheet store unreachable");
                false
            }
        }
    }

    async fn list(&self, sheet: Sheet) -> DbResult<Vec<Vec<Row>>> {
        let store = &self.store;
        let operation = format!("list {}", sheet);
        self.run(&operation, move || store.list_batches(sheet)).await
    }

    async fn run<T, F, Fut>(&self, operation: &str, mut attempt: F) -> DbResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = DbResult<T>> + Send,
    {
        let mut backoff = self.retry.backoff();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let err = match attempt().await {
                Ok(value) => {
                    self.health.write().await.last_success_at = Some(Utc::now());
                    debug!(operation, attempts, "Sheet operation succeeded");
                    return Ok(value);
                }
                Err(err) => err,
            };

            if err.is_retryable() {
                if let Some(delay) = backoff.next_backoff() {
                    warn!(operation, attempt = attempts, ?delay, error = %err, "Sheet operation failed, retrying");
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }

            error!(operation, attempts, error = %err, "Sheet operation failed");
            let failed = DbError::PersistenceFailed {
                operation: operation.to_string(),
                attempts,
                message: err.to_string(),
            };

            let mut health = self.health.write().await;
            health.last_error = Some(failed.to_string());
            health.last_error_at = Some(Utc::now());
            health.failed_operations += 1;
            return Err(failed);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
