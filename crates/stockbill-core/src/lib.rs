//! # stockbill-core: Pure Business Logic for stockbill
//!
//! Serialized stock, GST invoices and the arithmetic between them, as pure
//! functions and in-memory ledgers with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockbill Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (stock form, invoice form)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbill-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    tax    │  │   stock   │  │  invoice  │  │   │
//! │  │   │ StockItem │  │ reverse   │  │  Stock    │  │  Invoice  │  │   │
//! │  │   │ Invoice   │  │ GST, sums │  │  Ledger   │  │  Ledger   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbill-db (Sheet persistence)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockItem, Invoice, GstRate, ...)
//! - [`money`] - Money type in integer paise
//! - [`tax`] - Reverse GST, invoice totals, HSN breakdown
//! - [`words`] - Number-to-words for printed totals
//! - [`stock`] - Stock Ledger
//! - [`invoice`] - Invoice Ledger
//! - [`document`] - Printable invoice model
//! - [`validation`] - Request validation and defaulting
//! - [`coerce`] - Lenient JSON field coercion
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbill_core::money::Money;
//! use stockbill_core::tax::taxable_from_inclusive;
//! use stockbill_core::types::GstRate;
//!
//! let amount = taxable_from_inclusive(Money::from_rupees(118), GstRate::from_bps(1800)).unwrap();
//! assert_eq!(amount.to_string(), "₹100.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coerce;
pub mod document;
pub mod error;
pub mod invoice;
pub mod money;
pub mod stock;
pub mod tax;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{CompanyDetails, PrintableInvoice};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::InvoiceLedger;
pub use money::Money;
pub use stock::StockLedger;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// GST applied when a stock item or sheet row gives none (18%).
pub const DEFAULT_GST_BPS: u32 = 1800;

/// HSN printed when neither the invoice line nor the stock item has one.
///
/// 8507 is the tariff heading for electric accumulators.
pub const DEFAULT_HSN: &str = "85072000";

/// Today's date as `YYYY-MM-DD` (UTC), the default for stock and invoice dates.
pub fn today_iso() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
