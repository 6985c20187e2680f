//! # stockbill-db: Sheet Persistence for stockbill
//!
//! Durable storage for the two sheets behind the ledgers. Rows are plain
//! strings in a locked column order, so the data stays readable by anything
//! that understands a spreadsheet.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockbill Data Flow                              │
//! │                                                                         │
//! │  POST /api/invoices                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stockbill-core (InvoiceLedger::create on staged clones)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockbill-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Persister   │    │    codec      │    │  SheetStore  │  │   │
//! │  │   │ retry, health │───►│ ledger ⇄ rows │───►│ Sqlite/Memory│  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          SQLite (sheets + sheet_rows, WAL mode)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`sheets`] - The `SheetStore` trait and its two backends
//! - [`codec`] - Stock and invoice row layouts
//! - [`persister`] - Retrying writer with health tracking
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockbill_db::{Database, DbConfig, Persister, RetryPolicy};
//!
//! let db = Database::new(DbConfig::new("./stockbill.db")).await?;
//! let persister = Persister::new(Arc::new(db.sheets()), RetryPolicy::default());
//! let (stock, invoices) = persister.load().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod migrations;
pub mod persister;
pub mod pool;
pub mod sheets;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use persister::{PersistenceHealth, Persister, RetryPolicy};
pub use pool::{Database, DbConfig};
pub use sheets::{MemorySheets, Row, Sheet, SheetStore, SqliteSheets};
