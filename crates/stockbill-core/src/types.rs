//! # Domain Types
//!
//! Core domain types used throughout stockbill.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │   StockItem     │   │ InvoiceLineItem  │   │    Invoice      │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  serial_no (PK) │◄──│  serial_no       │◄──│  invoice_no     │      │
//! │  │  brand / model  │   │  rate (incl GST) │   │  customer_*     │      │
//! │  │  sale_price     │   │  amount (excl)   │   │  items[]        │      │
//! │  │  sold           │   │  gst_percent     │   │  totals         │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐                            │
//! │  │    GstRate      │   │  PaymentStatus   │                            │
//! │  │  ─────────────  │   │  ──────────────  │                            │
//! │  │  bps (u32)      │   │  PAID            │                            │
//! │  │  1800 = 18%     │   │  NOT_PAID        │                            │
//! │  └─────────────────┘   └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serial Number Identity
//! A serial number names exactly one physical unit. Invoice lines hold the
//! serial by value and never a handle into the stock ledger.
//!
//! ## Wire Shape
//! All structs serialize with camelCase keys, matching the web UI.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::coerce;
use crate::money::Money;
use crate::DEFAULT_GST_BPS;

// =============================================================================
// GST Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the usual rate for batteries)
///
/// Half of the rate is charged as CGST and half as SGST, so a rate also
/// knows how to split itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GstRate(u32);

impl GstRate {
    /// Creates a GST rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a rate from a percentage, rounding to the nearest basis point.
    ///
    /// Returns `None` for negative or non-finite input.
    pub fn from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || pct < 0.0 {
            return None;
        }
        let bps = (pct * 100.0).round();
        if bps > u32::MAX as f64 {
            return None;
        }
        Some(GstRate(bps as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The CGST (or SGST) share: half the rate.
    ///
    /// 18% → 9%, 5% → 2.5%. An odd basis point loses its half.
    #[inline]
    pub const fn half(&self) -> Self {
        GstRate(self.0 / 2)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate(DEFAULT_GST_BPS)
    }
}

/// Prints `18%`, `2.5%` or `0.25%`, trimming trailing zeros.
impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

impl Serialize for GstRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u32(self.0 / 100)
        } else {
            serializer.serialize_f64(self.percentage())
        }
    }
}

struct GstRateVisitor;

impl<'de> Visitor<'de> for GstRateVisitor {
    type Value = GstRate;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a GST percentage as a number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<GstRate, E> {
        u32::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(GstRate)
            .ok_or_else(|| E::custom("GST rate out of range"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<GstRate, E> {
        u64::try_from(v)
            .map_err(|_| E::custom("GST rate must not be negative"))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<GstRate, E> {
        GstRate::from_percentage(v).ok_or_else(|| E::custom("GST rate out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<GstRate, E> {
        let as_money: Money = v.parse().map_err(E::custom)?;
        u32::try_from(as_money.paise())
            .map(GstRate)
            .map_err(|_| E::custom("GST rate out of range"))
    }
}

impl<'de> Deserialize<'de> for GstRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GstRateVisitor)
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// Status text shown for unsold stock.
pub const STATUS_AVAILABLE: &str = "Available";

/// Status text for sold stock, and the literal stored in the stock sheet.
pub const STATUS_SOLD: &str = "SOLD";

/// One physical serialized unit available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    /// Unique key across all stock ever added.
    pub serial_no: String,

    /// Acquisition date as entered (usually `YYYY-MM-DD`).
    pub date: String,

    pub brand: String,
    pub model: String,

    #[ts(type = "number")]
    pub purchase_price: Money,

    /// GST-inclusive selling price.
    #[ts(type = "number")]
    pub sale_price: Money,

    #[ts(type = "number")]
    pub gst_percent: GstRate,

    /// Tariff code, may be empty.
    #[serde(default)]
    pub hsn: String,

    /// `Available` or `SOLD`, always in step with `sold`.
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub sold: bool,
}

impl StockItem {
    /// `brand model`, the item name printed on invoice lines.
    pub fn item_name(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }

    /// Flips the item to sold. Calling it twice is harmless.
    pub fn mark_sold(&mut self) {
        self.sold = true;
        self.status = STATUS_SOLD.to_string();
    }
}

/// A stock item as submitted by the form or an Excel import.
///
/// Every field is optional and coerced leniently; `validation` turns it into
/// a [`StockItem`] with defaults applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewStockItem {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub serial_no: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub brand: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub model: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_money")]
    #[ts(type = "number | null")]
    pub purchase_price: Option<Money>,

    #[serde(default, deserialize_with = "coerce::opt_money")]
    #[ts(type = "number | null")]
    pub sale_price: Option<Money>,

    #[serde(default, deserialize_with = "coerce::opt_rate")]
    #[ts(type = "number | null")]
    pub gst_percent: Option<GstRate>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub hsn: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub status: Option<String>,
}

/// Body of `POST /api/stock/bulk`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct BulkStockRequest {
    #[serde(default)]
    pub items: Option<Vec<NewStockItem>>,
}

/// Counts for the stock dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_items: usize,
    pub available_items: usize,
    pub sold_items: usize,

    /// Summed sale price of unsold stock.
    #[ts(type = "number")]
    pub available_value: Money,
}

// =============================================================================
// Payment Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    #[default]
    NotPaid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::NotPaid => "NOT_PAID",
        }
    }

    /// Parses the sheet/form spelling. Case and surrounding space are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PAID" => Some(PaymentStatus::Paid),
            "NOT_PAID" | "NOT PAID" | "UNPAID" => Some(PaymentStatus::NotPaid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Invoice Line Item
// =============================================================================

/// One sold unit as it appears on an invoice.
///
/// Snapshot pattern: brand, model and HSN are copied from stock at sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub serial_no: String,

    /// `brand model`.
    pub item_name: String,

    pub brand: String,
    pub model: String,
    pub hsn: String,

    /// Always 1: one serial per line.
    pub qty: u32,

    /// GST-inclusive unit price.
    #[ts(type = "number")]
    pub rate: Money,

    /// Always zero today.
    #[ts(type = "number")]
    pub discount: Money,

    #[ts(type = "number")]
    pub gst_percent: GstRate,

    /// Taxable value: `rate / (1 + gst/100)`, rounded to the paisa.
    #[ts(type = "number")]
    pub amount: Money,
}

impl InvoiceLineItem {
    /// Tax carried by this line: `rate - amount`.
    #[inline]
    pub fn tax(&self) -> Money {
        self.rate - self.amount
    }
}

/// A line in an invoice request.
///
/// Only the serial is required. Brand, model and item name are always taken
/// from stock; a client-side `amount` is ignored and recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineRequest {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub serial_no: Option<String>,

    /// Overrides the stock sale price.
    #[serde(default, deserialize_with = "coerce::opt_money")]
    #[ts(type = "number | null")]
    pub rate: Option<Money>,

    /// Overrides the stock GST rate.
    #[serde(default, deserialize_with = "coerce::opt_rate")]
    #[ts(type = "number | null")]
    pub gst_percent: Option<GstRate>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub hsn: Option<String>,
}

// =============================================================================
// Invoice
// =============================================================================

/// Body of `POST /api/invoices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub invoice_no: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub invoice_date: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub customer_name: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub customer_gstin: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub customer_place: Option<String>,

    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub customer_mobile: Option<String>,

    /// `PAID` or `NOT_PAID`; defaults to `NOT_PAID`.
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub payment_status: Option<String>,

    #[serde(default)]
    pub items: Vec<InvoiceLineRequest>,
}

/// Aggregate money on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    #[ts(type = "number")]
    pub taxable_amount: Money,
    #[ts(type = "number")]
    pub cgst_amount: Money,
    #[ts(type = "number")]
    pub sgst_amount: Money,
    #[ts(type = "number")]
    pub total_amount: Money,
}

/// A finalized sale document. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_no: String,
    pub invoice_date: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_gstin: String,
    #[serde(default)]
    pub customer_place: String,
    #[serde(default)]
    pub customer_mobile: String,
    pub payment_status: PaymentStatus,
    pub items: Vec<InvoiceLineItem>,

    #[ts(type = "number")]
    #[serde(alias = "texableAmount")]
    pub taxable_amount: Money,
    #[ts(type = "number")]
    pub cgst_amount: Money,
    #[ts(type = "number")]
    pub sgst_amount: Money,
    #[ts(type = "number")]
    pub total_amount: Money,
}

/// One row of the HSN tax summary printed under the line table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdownRow {
    pub hsn: String,
    #[ts(type = "number")]
    pub taxable_value: Money,
    #[ts(type = "number")]
    pub cgst_rate: GstRate,
    #[ts(type = "number")]
    pub cgst_amount: Money,
    #[ts(type = "number")]
    pub sgst_rate: GstRate,
    #[ts(type = "number")]
    pub sgst_amount: Money,
    #[ts(type = "number")]
    pub total_tax: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn battery() -> StockItem {
        StockItem {
            serial_no: "EX-1001".to_string(),
            date: "2026-01-05".to_string(),
            brand: "Exide".to_string(),
            model: "FEP0-EPIQ35L".to_string(),
            purchase_price: Money::from_rupees(3000),
            sale_price: Money::from_rupees(4130),
            gst_percent: GstRate::from_bps(1800),
            hsn: String::new(),
            status: STATUS_AVAILABLE.to_string(),
            sold: false,
        }
    }

    #[test]
    fn test_gst_rate_display() {
        assert_eq!(GstRate::from_bps(1800).to_string(), "18%");
        assert_eq!(GstRate::from_bps(250).to_string(), "2.5%");
        assert_eq!(GstRate::from_bps(25).to_string(), "0.25%");
        assert_eq!(GstRate::from_bps(1800).half().to_string(), "9%");
        assert_eq!(GstRate::from_bps(500).half().to_string(), "2.5%");
    }

    #[test]
    fn test_gst_rate_serde() {
        assert_eq!(serde_json::to_string(&GstRate::from_bps(1800)).unwrap(), "18");
        assert_eq!(serde_json::to_string(&GstRate::from_bps(250)).unwrap(), "2.5");

        let r: GstRate = serde_json::from_str("28").unwrap();
        assert_eq!(r.bps(), 2800);
        let r: GstRate = serde_json::from_str("12.5").unwrap();
        assert_eq!(r.bps(), 1250);
        let r: GstRate = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(r.bps(), 500);
        assert!(serde_json::from_str::<GstRate>("-1").is_err());
    }

    #[test]
    fn test_default_gst_is_18() {
        assert_eq!(GstRate::default().bps(), 1800);
    }

    #[test]
    fn test_stock_item_wire_shape() {
        let json = serde_json::to_value(battery()).unwrap();
        assert_eq!(json["serialNo"], "EX-1001");
        assert_eq!(json["salePrice"], 4130.0);
        assert_eq!(json["gstPercent"], 18);
        assert_eq!(json["sold"], false);
    }

    #[test]
    fn test_mark_sold_sets_status() {
        let mut item = battery();
        item.mark_sold();
        item.mark_sold();
        assert!(item.sold);
        assert_eq!(item.status, "SOLD");
    }

    #[test]
    fn test_item_name() {
        assert_eq!(battery().item_name(), "Exide FEP0-EPIQ35L");
    }

    #[test]
    fn test_payment_status() {
        assert_eq!(PaymentStatus::parse("paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse(" NOT_PAID "), Some(PaymentStatus::NotPaid));
        assert_eq!(PaymentStatus::parse("partial"), None);
        assert_eq!(
            serde_json::to_string(&PaymentStatus::NotPaid).unwrap(),
            "\"NOT_PAID\""
        );
        assert_eq!(PaymentStatus::default(), PaymentStatus::NotPaid);
    }

    #[test]
    fn test_new_stock_item_accepts_excel_shapes() {
        let item: NewStockItem = serde_json::from_str(
            r#"{"serialNo": 778812, "brand": "Amaron", "model": "PRO", "salePrice": "5200", "gstPercent": ""}"#,
        )
        .unwrap();
        assert_eq!(item.serial_no.as_deref(), Some("778812"));
        assert_eq!(item.sale_price, Some(Money::from_rupees(5200)));
        assert!(item.gst_percent.is_none());
        assert!(item.purchase_price.is_none());
    }

    #[test]
    fn test_invoice_request_ignores_client_amount() {
        let req: CreateInvoiceRequest = serde_json::from_str(
            r#"{"invoiceNo": "INV-1", "customerName": "Ravi",
                "items": [{"serialNo": "EX-1001", "rate": 118, "gstPercent": 18, "amount": 1}]}"#,
        )
        .unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].rate, Some(Money::from_rupees(118)));
    }
}
