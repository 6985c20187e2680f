//! # Invoice Ledger
//!
//! Append-only record of finalized invoices.
//!
//! ## Creating an Invoice
//! ```text
//! CreateInvoiceRequest
//!      │
//!      ▼
//! Phase 1: validate (nothing is touched yet)
//!   ├── invoiceNo, customerName present
//!   ├── at least one line, each with a serial
//!   ├── serials unique, in stock, unsold     ← StockLedger::check_sellable
//!   ├── each line's rate and GST positive
//!   └── totals fit                           ← aggregate_totals
//!      │
//!      ▼
//! Phase 2: commit
//!   ├── StockLedger::mark_all_sold
//!   └── push Invoice
//! ```
//!
//! Any failure in phase 1 returns before either ledger changes, so a bad
//! third line never leaves the first two sold.

use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::stock::StockLedger;
use crate::tax::{aggregate_totals, line_from_stock};
use crate::types::{CreateInvoiceRequest, Invoice, InvoiceLineItem};
use crate::validation::{validate_gst_rate, validate_invoice_header, validate_positive, InvoiceHeader};

/// Finalized invoices in creation order.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLedger {
    invoices: Vec<Invoice>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the ledger from persisted invoices.
    pub fn restore(invoices: Vec<Invoice>) -> Self {
        Self { invoices }
    }

    pub fn list(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Looks up an invoice by number. Numbers are not unique; the most
    /// recent invoice wins.
    pub fn find(&self, invoice_no: &str) -> Option<&Invoice> {
        self.invoices
            .iter()
            .rev()
            .find(|inv| inv.invoice_no == invoice_no)
    }

    /// Validates a request, marks its serials sold and records the invoice.
    ///
    /// `today` fills in a missing invoice date.
    ///
    /// ## Errors
    /// `CoreError::Validation` for a bad request. Unknown serials surface as
    /// `ValidationError::UnknownSerial`. `InvalidInput` when the totals
    /// overflow. On error neither ledger changes.
    pub fn create(
        &mut self,
        request: &CreateInvoiceRequest,
        stock: &mut StockLedger,
        today: &str,
    ) -> CoreResult<Invoice> {
        // Phase 1: validate
        let header = validate_invoice_header(request, today)?;

        if request.items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            }
            .into());
        }

        let serials = request
            .items
            .iter()
            .map(|line| {
                line.serial_no
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| ValidationError::Required {
                        field: "items.serialNo".to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        stock.check_sellable(serials.as_slice()).map_err(|err| match err {
            CoreError::NotFound(serial_no) => ValidationError::UnknownSerial { serial_no }.into(),
            other => other,
        })?;

        let mut lines = Vec::with_capacity(serials.len());
        for (serial, line) in serials.iter().zip(&request.items) {
            let item = stock.get(serial).ok_or_else(|| ValidationError::UnknownSerial {
                serial_no: serial.clone(),
            })?;

            let rate = line.rate.unwrap_or(item.sale_price);
            let gst = line.gst_percent.unwrap_or(item.gst_percent);
            validate_positive("rate", rate)?;
            validate_gst_rate("gstPercent", gst)?;

            lines.push(line_from_stock(item, Some(rate), Some(gst), line.hsn.as_deref())?);
        }

        if self.find(&header.invoice_no).is_some() {
            warn!(invoice_no = %header.invoice_no, "Invoice number already used");
        }

        let invoice = assemble(header, lines)?;

        // Phase 2: commit
        stock.mark_all_sold(serials.as_slice())?;
        self.invoices.push(invoice.clone());

        debug!(
            invoice_no = %invoice.invoice_no,
            lines = invoice.items.len(),
            total = %invoice.total_amount,
            "Invoice created"
        );
        Ok(invoice)
    }
}

/// Puts a header and computed lines together, deriving the totals.
pub fn assemble(header: InvoiceHeader, items: Vec<InvoiceLineItem>) -> CoreResult<Invoice> {
    let totals = aggregate_totals(&items)?;
    Ok(Invoice {
        invoice_no: header.invoice_no,
        invoice_date: header.invoice_date,
        customer_name: header.customer_name,
        customer_gstin: header.customer_gstin,
        customer_place: header.customer_place,
        customer_mobile: header.customer_mobile,
        payment_status: header.payment_status,
        items,
        taxable_amount: totals.taxable_amount,
        cgst_amount: totals.cgst_amount,
        sgst_amount: totals.sgst_amount,
        total_amount: totals.total_amount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
