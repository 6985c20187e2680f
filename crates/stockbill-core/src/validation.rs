//! # Validation Module
//!
//! Turns lenient request shapes into checked domain values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (coerce)                                     │
//! │  ├── "118" / 118 / 118.0 all become ₹118.00                            │
//! │  └── Blanks and garbage become None                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, defaults, sign checks                            │
//! │  └── Bulk import filtering                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledgers                                                      │
//! │  ├── Serial uniqueness                                                 │
//! │  └── Sellability (exists, unsold)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbill_core::types::NewStockItem;
//! use stockbill_core::validation::build_stock_item;
//! use stockbill_core::money::Money;
//!
//! let form = NewStockItem {
//!     serial_no: Some("EX-1".into()),
//!     brand: Some("Exide".into()),
//!     model: Some("EPIQ".into()),
//!     sale_price: Some(Money::from_rupees(4130)),
//!     ..Default::default()
//! };
//! let item = build_stock_item(form, "2026-01-05").unwrap();
//! assert_eq!(item.gst_percent.bps(), 1800);
//! assert_eq!(item.status, "Available");
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{
    CreateInvoiceRequest, GstRate, NewStockItem, PaymentStatus, StockItem, STATUS_AVAILABLE,
    STATUS_SOLD,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Fails unless `amount > 0`.
pub fn validate_positive(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(ValidationError::MustBePositive {
            field: field.to_string(),
        })
    }
}

/// Fails when `amount < 0`.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Fails unless the rate is above zero.
pub fn validate_gst_rate(field: &str, rate: GstRate) -> ValidationResult<()> {
    if rate.is_zero() {
        Err(ValidationError::MustBePositive {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

fn required_text(field: &str, value: Option<&str>) -> ValidationResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

fn optional_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

// =============================================================================
// Stock Items
// =============================================================================

/// Builds a stock item from the single-add form.
///
/// ## Rules
/// - `serialNo`, `brand`, `model`, `salePrice` are required
/// - Prices must not be negative
/// - `date` defaults to `today`, `purchasePrice` to 0, `gstPercent` to 18,
///   `hsn` to empty
/// - `status` is `SOLD` (any case) for an item already sold, anything else
///   reads as `Available`
/// - A zero GST rate is treated as absent and becomes 18
pub fn build_stock_item(form: NewStockItem, today: &str) -> ValidationResult<StockItem> {
    let serial_no = required_text("serialNo", form.serial_no.as_deref())?;
    let brand = required_text("brand", form.brand.as_deref())?;
    let model = required_text("model", form.model.as_deref())?;
    let sale_price = form.sale_price.ok_or_else(|| ValidationError::Required {
        field: "salePrice".to_string(),
    })?;
    let purchase_price = form.purchase_price.unwrap_or_default();

    validate_non_negative("salePrice", sale_price)?;
    validate_non_negative("purchasePrice", purchase_price)?;
    let (status, sold) = status_of(form.status.as_deref());

    Ok(StockItem {
        serial_no,
        date: form
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| today.to_string()),
        brand,
        model,
        purchase_price,
        sale_price,
        gst_percent: form
            .gst_percent
            .filter(|r| !r.is_zero())
            .unwrap_or_default(),
        hsn: optional_text(form.hsn),
        status: status.to_string(),
        sold,
    })
}

/// The stored status and sold flag for a client-sent status. Only `SOLD`
/// survives the stock sheet, so any other text becomes `Available`.
fn status_of(status: Option<&str>) -> (&'static str, bool) {
    match status.map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case(STATUS_SOLD) => (STATUS_SOLD, true),
        _ => (STATUS_AVAILABLE, false),
    }
}

/// Coerces one row of an Excel import.
///
/// Unlike the single-add form nothing is required up front: rows without
/// a serial or without a positive sale price are dropped (`None`), every
/// other field is defaulted.
pub fn coerce_bulk_item(row: NewStockItem, today: &str) -> Option<StockItem> {
    let serial_no = optional_text(row.serial_no);
    let sale_price = row.sale_price.unwrap_or_default();
    if serial_no.is_empty() || !sale_price.is_positive() {
        return None;
    }
    let (status, sold) = status_of(row.status.as_deref());

    Some(StockItem {
        serial_no,
        date: row
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| today.to_string()),
        brand: optional_text(row.brand),
        model: optional_text(row.model),
        purchase_price: row
            .purchase_price
            .filter(|p| !p.is_negative())
            .unwrap_or_default(),
        sale_price,
        gst_percent: row
            .gst_percent
            .filter(|r| !r.is_zero())
            .unwrap_or_default(),
        hsn: optional_text(row.hsn),
        status: status.to_string(),
        sold,
    })
}

// =============================================================================
// Invoice Header
// =============================================================================

/// The checked header fields of an invoice request.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceHeader {
    pub invoice_no: String,
    pub invoice_date: String,
    pub customer_name: String,
    pub customer_gstin: String,
    pub customer_place: String,
    pub customer_mobile: String,
    pub payment_status: PaymentStatus,
}

/// Validates everything on an invoice request except its lines.
///
/// `invoiceNo` and `customerName` are required. `invoiceDate` defaults to
/// `today` and `paymentStatus` to `NOT_PAID`.
pub fn validate_invoice_header(
    request: &CreateInvoiceRequest,
    today: &str,
) -> ValidationResult<InvoiceHeader> {
    let invoice_no = required_text("invoiceNo", request.invoice_no.as_deref())?;
    let customer_name = required_text("customerName", request.customer_name.as_deref())?;

    let payment_status = match request.payment_status.as_deref() {
        None => PaymentStatus::default(),
        Some(raw) => PaymentStatus::parse(raw).ok_or_else(|| ValidationError::InvalidFormat {
            field: "paymentStatus".to_string(),
            reason: format!("'{}' is not PAID or NOT_PAID", raw),
        })?,
    };

    Ok(InvoiceHeader {
        invoice_no,
        invoice_date: request
            .invoice_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(today)
            .to_string(),
        customer_name,
        customer_gstin: optional_text(request.customer_gstin.clone()),
        customer_place: optional_text(request.customer_place.clone()),
        customer_mobile: optional_text(request.customer_mobile.clone()),
        payment_status,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
