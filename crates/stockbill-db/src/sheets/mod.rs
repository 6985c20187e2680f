//! # Sheets
//!
//! The pluggable tabular store behind the ledgers.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sheet::Stock                                                           │
//! │  serialNo │ date │ brand │ model │ purchasePrice │ ... │ status         │
//! │  EX-1     │ ...  │ Exide │ EPIQ  │ 3000          │ ... │ SOLD           │
//! │  AM-7     │ ...  │ ...   │ ...   │ ...           │ ... │                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Sheet::Invoices  (one row per invoice line)                            │
//! │  invoiceNo │ invoiceDate │ customerName │ ... │ rate │ paymentStatus    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`Row`] is a vector of text cells in the sheet's column order. Stores
//! know nothing about what the cells mean; that lives in [`crate::codec`].
//!
//! Every write is remembered as one batch. `replace_all` leaves a single
//! batch, each `append_rows` adds one. Invoices rely on this to keep two
//! invoices with the same number apart.
//!
//! ## Implementations
//! - [`SqliteSheets`] - durable, one SQLite table of JSON-encoded rows
//! - [`MemorySheets`] - process-local, with a switch to fail writes

mod memory;
mod sqlite;

pub use memory::MemorySheets;
pub use sqlite::SqliteSheets;

use async_trait::async_trait;
use std::fmt;

use crate::error::DbResult;

/// One row of text cells, in column order.
pub type Row = Vec<String>;

/// The two sheets and their locked column layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Stock,
    Invoices,
}

impl Sheet {
    pub const ALL: [Sheet; 2] = [Sheet::Stock, Sheet::Invoices];

    /// Sheet title as stored.
    pub const fn name(&self) -> &'static str {
        match self {
            Sheet::Stock => "Stock",
            Sheet::Invoices => "Invoices",
        }
    }

    /// Header row. Column order is fixed; never reorder.
    pub const fn headers(&self) -> &'static [&'static str] {
        match self {
            Sheet::Stock => &[
                "serialNo",
                "date",
                "brand",
                "model",
                "purchasePrice",
                "salePrice",
                "gstPercent",
                "hsn",
                "status",
            ],
            Sheet::Invoices => &[
                "invoiceNo",
                "invoiceDate",
                "customerName",
                "customerGstin",
                "customerMobile",
                "serialNo",
                "itemName",
                "brand",
                "model",
                "qty",
                "rate",
                "paymentStatus",
            ],
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A durable home for sheets.
///
/// Implementations must keep rows in the order they were written, keep the
/// boundaries between writes, and make every write all-or-nothing.
#[async_trait]
pub trait SheetStore: Send + Sync + fmt::Debug {
    /// Rows grouped by the write that stored them, oldest first. Empty
    /// batches are left out.
    async fn list_batches(&self, sheet: Sheet) -> DbResult<Vec<Vec<Row>>>;

    /// Every row of a sheet, in order. A sheet never written is empty.
    async fn list_all(&self, sheet: Sheet) -> DbResult<Vec<Row>> {
        Ok(self.list_batches(sheet).await?.into_iter().flatten().collect())
    }

    /// Replaces the whole sheet with `rows`.
    async fn replace_all(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()>;

    /// Adds `rows` after the existing ones.
    async fn append_rows(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()>;

    /// Cheap round trip to the backing store, without touching any sheet.
    async fn ping(&self) -> DbResult<()>;
}
