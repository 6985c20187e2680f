//! # Row Codecs
//!
//! Converts ledger entries to and from sheet rows.
//!
//! ## Stock Sheet
//! ```text
//! serialNo │ date │ brand │ model │ purchasePrice │ salePrice │ gstPercent │ hsn │ status
//! EX-1     │ 2026-01-05 │ Exide │ EPIQ │ 3000 │ 4130 │ 18 │ │ SOLD
//! ```
//! `status` is the literal `SOLD` or empty; nothing else is stored.
//!
//! ## Invoices Sheet
//! ```text
//! invoiceNo │ invoiceDate │ customerName │ customerGstin │ customerMobile │
//! serialNo │ itemName │ brand │ model │ qty │ rate │ paymentStatus
//! ```
//! One row per line, and each invoice is appended as its own batch. Loading
//! never joins rows from different batches, so two invoices that share a
//! number stay two invoices. Inside a batch (a hand-typed sheet is one big
//! batch) adjacent rows with the same number form one invoice. The layout
//! has no GST, HSN or place columns: loading takes GST and HSN from the
//! referenced stock item and recomputes every amount.
//!
//! Decoding is lenient like a spreadsheet: missing trailing cells read as
//! empty and unparseable numbers as zero.

use tracing::warn;

use stockbill_core::invoice::assemble;
use stockbill_core::tax::taxable_from_inclusive;
use stockbill_core::validation::InvoiceHeader;
use stockbill_core::{
    GstRate, Invoice, InvoiceLineItem, Money, PaymentStatus, StockItem, StockLedger,
    DEFAULT_HSN, STATUS_AVAILABLE, STATUS_SOLD,
};

use crate::sheets::Row;

// =============================================================================
// Cells
// =============================================================================

/// `4130`, `118.5`, `0.05`: a plain number a spreadsheet will accept.
pub fn money_cell(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let whole = amount.rupees().abs();
    match amount.paise_part() {
        0 => format!("{}{}", sign, whole),
        p if p % 10 == 0 => format!("{}{}.{}", sign, whole, p / 10),
        p => format!("{}{}.{:02}", sign, whole, p),
    }
}

/// `18`, `2.5`.
pub fn rate_cell(rate: GstRate) -> String {
    money_cell(Money::from_paise(rate.bps() as i64))
}

fn cell(row: &Row, index: usize) -> &str {
    row.get(index).map(|c| c.trim()).unwrap_or("")
}

fn money_of(text: &str) -> Money {
    text.parse().unwrap_or_default()
}

fn rate_of(text: &str) -> GstRate {
    u32::try_from(money_of(text).paise())
        .map(GstRate::from_bps)
        .unwrap_or_else(|_| GstRate::from_bps(0))
}

// =============================================================================
// Stock
// =============================================================================

pub fn stock_to_row(item: &StockItem) -> Row {
    vec![
        item.serial_no.clone(),
        item.date.clone(),
        item.brand.clone(),
        item.model.clone(),
        money_cell(item.purchase_price),
        money_cell(item.sale_price),
        rate_cell(item.gst_percent),
        item.hsn.clone(),
        if item.sold {
            STATUS_SOLD.to_string()
        } else {
            String::new()
        },
    ]
}

/// Decodes one stock row. Only `SOLD` (any case) in the status cell means
/// sold; a zero or blank GST reads as the 18% default.
pub fn stock_from_row(row: &Row) -> StockItem {
    let sold = cell(row, 8).eq_ignore_ascii_case(STATUS_SOLD);
    let gst = rate_of(cell(row, 6));

    StockItem {
        serial_no: cell(row, 0).to_string(),
        date: cell(row, 1).to_string(),
        brand: cell(row, 2).to_string(),
        model: cell(row, 3).to_string(),
        purchase_price: money_of(cell(row, 4)),
        sale_price: money_of(cell(row, 5)),
        gst_percent: if gst.is_zero() { GstRate::default() } else { gst },
        hsn: cell(row, 7).to_string(),
        status: if sold { STATUS_SOLD } else { STATUS_AVAILABLE }.to_string(),
        sold,
    }
}

/// Decodes the stock sheet, dropping rows without a serial number.
pub fn stock_from_rows(rows: &[Row]) -> Vec<StockItem> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let item = stock_from_row(row);
            if item.serial_no.is_empty() {
                warn!(row = i + 1, "Skipping stock row without serial number");
                None
            } else {
                Some(item)
            }
        })
        .collect()
}

// =============================================================================
// Invoices
// =============================================================================

/// One row per invoice line.
pub fn invoice_rows(invoice: &Invoice) -> Vec<Row> {
    invoice
        .items
        .iter()
        .map(|line| {
            vec![
                invoice.invoice_no.clone(),
                invoice.invoice_date.clone(),
                invoice.customer_name.clone(),
                invoice.customer_gstin.clone(),
                invoice.customer_mobile.clone(),
                line.serial_no.clone(),
                line.item_name.clone(),
                line.brand.clone(),
                line.model.clone(),
                line.qty.to_string(),
                money_cell(line.rate),
                invoice.payment_status.as_str().to_string(),
            ]
        })
        .collect()
}

/// Rebuilds invoices from stored batches, using `stock` for GST and HSN.
///
/// Within a batch, a run of adjacent rows with the same invoice number is
/// one invoice. A new batch always starts a new invoice.
pub fn invoices_from_batches(batches: &[Vec<Row>], stock: &StockLedger) -> Vec<Invoice> {
    let mut blocks: Vec<(InvoiceHeader, Vec<InvoiceLineItem>)> = Vec::new();
    let mut row_number = 0;

    for batch in batches {
        let mut open = false;
        for row in batch {
            row_number += 1;
            let invoice_no = cell(row, 0);
            if invoice_no.is_empty() {
                warn!(row = row_number, "Skipping invoice row without invoice number");
                continue;
            }

            let line = line_from_row(row, stock);
            match blocks.last_mut() {
                Some((header, lines)) if open && header.invoice_no == invoice_no => {
                    lines.push(line)
                }
                _ => blocks.push((header_from_row(row), vec![line])),
            }
            open = true;
        }
    }

    blocks
        .into_iter()
        .filter_map(|(header, lines)| {
            let invoice_no = header.invoice_no.clone();
            assemble(header, lines)
                .map_err(|err| warn!(invoice_no, error = %err, "Skipping stored invoice"))
                .ok()
        })
        .collect()
}

fn header_from_row(row: &Row) -> InvoiceHeader {
    InvoiceHeader {
        invoice_no: cell(row, 0).to_string(),
        invoice_date: cell(row, 1).to_string(),
        customer_name: cell(row, 2).to_string(),
        customer_gstin: cell(row, 3).to_string(),
        customer_place: String::new(),
        customer_mobile: cell(row, 4).to_string(),
        payment_status: PaymentStatus::parse(cell(row, 11)).unwrap_or_default(),
    }
}

/// Rebuilds one line. The GST rate always comes from stock, so a rate
/// overridden in the original request does not survive a reload; the stored
/// `rate` is kept and the taxable amount is recomputed at the stock rate.
fn line_from_row(row: &Row, stock: &StockLedger) -> InvoiceLineItem {
    let serial_no = cell(row, 5);
    let stocked = stock.get(serial_no);

    let gst_percent = stocked
        .map(|s| s.gst_percent)
        .filter(|g| !g.is_zero())
        .unwrap_or_default();
    let hsn = stocked
        .map(|s| s.hsn.trim())
        .filter(|h| !h.is_empty())
        .unwrap_or(DEFAULT_HSN);

    let rate = money_of(cell(row, 10));
    let amount = taxable_from_inclusive(rate, gst_percent).unwrap_or_else(|err| {
        warn!(serial_no, error = %err, "Stored invoice line has no taxable value");
        Money::zero()
    });

    InvoiceLineItem {
        serial_no: serial_no.to_string(),
        item_name: cell(row, 6).to_string(),
        brand: cell(row, 7).to_string(),
        model: cell(row, 8).to_string(),
        hsn: hsn.to_string(),
        qty: cell(row, 9).parse().unwrap_or(1),
        rate,
        discount: Money::zero(),
        gst_percent,
        amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockbill_core::types::{CreateInvoiceRequest, InvoiceLineRequest};
    use stockbill_core::InvoiceLedger;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn item(serial: &str, sale_rupees: i64, gst_bps: u32, hsn: &str) -> StockItem {
        StockItem {
            serial_no: serial.to_string(),
            date: "2026-01-05".to_string(),
            brand: "Exide".to_string(),
            model: "EPIQ".to_string(),
            purchase_price: Money::from_paise(300050),
            sale_price: Money::from_rupees(sale_rupees),
            gst_percent: GstRate::from_bps(gst_bps),
            hsn: hsn.to_string(),
            status: STATUS_AVAILABLE.to_string(),
            sold: false,
        }
    }

    #[test]
    fn test_money_cell() {
        assert_eq!(money_cell(Money::from_rupees(4130)), "4130");
        assert_eq!(money_cell(Money::from_paise(11850)), "118.5");
        assert_eq!(money_cell(Money::from_paise(11805)), "118.05");
        assert_eq!(money_cell(Money::from_paise(5)), "0.05");
        assert_eq!(rate_cell(GstRate::from_bps(250)), "2.5");
    }

    #[test]
    fn test_stock_row_layout() {
        let mut sold = item("EX-1", 4130, 1800, "");
        sold.mark_sold();
        assert_eq!(
            stock_to_row(&sold),
            row(&["EX-1", "2026-01-05", "Exide", "EPIQ", "3000.5", "4130", "18", "", "SOLD"])
        );

        let unsold = item("EX-2", 4130, 1800, "");
        assert_eq!(stock_to_row(&unsold)[8], "");
    }

    #[test]
    fn test_stock_row_decodes_status() {
        let decoded = stock_from_row(&row(&[
            "EX-1", "2026-01-05", "Exide", "EPIQ", "3000.5", "4130", "18", "85072000", "sold",
        ]));
        assert!(decoded.sold);
        assert_eq!(decoded.status, "SOLD");
        assert_eq!(decoded.purchase_price, Money::from_paise(300050));

        let decoded = stock_from_row(&row(&["EX-2", "", "", "", "", "", "", "", "Available"]));
        assert!(!decoded.sold);
        assert_eq!(decoded.status, "Available");
    }

    #[test]
    fn test_stock_row_is_lenient() {
        let decoded = stock_from_row(&row(&["EX-3", "2026-01-05", "Exide"]));
        assert_eq!(decoded.model, "");
        assert_eq!(decoded.sale_price, Money::zero());
        assert_eq!(decoded.gst_percent.bps(), 1800);

        let items = stock_from_rows(&[row(&["", "x"]), row(&["EX-4"])]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].serial_no, "EX-4");
    }

    #[test]
    fn test_stock_encode_decode_keeps_fields() {
        let mut original = item("EX-5", 4130, 2800, "85071000");
        original.mark_sold();
        assert_eq!(stock_from_row(&stock_to_row(&original)), original);
    }

    #[test]
    fn test_invoice_rows_layout() {
        let mut stock = StockLedger::new();
        stock.add(item("S1", 118, 1800, "")).unwrap();
        stock.add(item("S2", 236, 1800, "")).unwrap();
        let mut ledger = InvoiceLedger::new();
        let request = CreateInvoiceRequest {
            invoice_no: Some("INV-1".to_string()),
            customer_name: Some("Ravi".to_string()),
            customer_mobile: Some("98260".to_string()),
            payment_status: Some("PAID".to_string()),
            items: vec![
                InvoiceLineRequest {
                    serial_no: Some("S1".to_string()),
                    ..Default::default()
                },
                InvoiceLineRequest {
                    serial_no: Some("S2".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let invoice = ledger.create(&request, &mut stock, "2026-04-01").unwrap();

        let rows = invoice_rows(&invoice);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            row(&[
                "INV-1", "2026-04-01", "Ravi", "", "98260", "S1", "Exide EPIQ", "Exide", "EPIQ",
                "1", "118", "PAID"
            ])
        );
    }

    #[test]
    fn test_invoices_from_batches_groups_and_recomputes() {
        let mut stock = StockLedger::new();
        stock.add(item("S1", 118, 1800, "")).unwrap();
        stock.add(item("S2", 105, 500, "85071000")).unwrap();

        let rows = vec![
            row(&["INV-1", "2026-04-01", "Ravi", "", "", "S1", "Exide EPIQ", "Exide", "EPIQ", "1", "118", "PAID"]),
            row(&["INV-1", "2026-04-01", "Ravi", "", "", "S2", "Exide EPIQ", "Exide", "EPIQ", "1", "105", "PAID"]),
            row(&["INV-2", "2026-04-02", "Sita", "", "", "GONE", "Old Item", "Old", "Item", "1", "236", "NOT_PAID"]),
        ];
        let invoices = invoices_from_batches(&[rows], &stock);

        assert_eq!(invoices.len(), 2);
        let first = &invoices[0];
        assert_eq!(first.invoice_no, "INV-1");
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.payment_status, PaymentStatus::Paid);
        assert_eq!(first.items[0].amount, Money::from_rupees(100));
        assert_eq!(first.items[0].hsn, DEFAULT_HSN);
        assert_eq!(first.items[1].gst_percent.bps(), 500);
        assert_eq!(first.items[1].amount, Money::from_rupees(100));
        assert_eq!(first.items[1].hsn, "85071000");
        assert_eq!(first.total_amount, Money::from_rupees(223));
        assert_eq!(first.taxable_amount, Money::from_rupees(200));

        // unknown serial falls back to 18%
        let second = &invoices[1];
        assert_eq!(second.items[0].gst_percent.bps(), 1800);
        assert_eq!(second.items[0].amount, Money::from_rupees(200));
    }

    #[test]
    fn test_reused_invoice_number_stays_two_invoices() {
        let mut stock = StockLedger::new();
        stock.add(item("A", 118, 1800, "")).unwrap();
        stock.add(item("B", 236, 1800, "")).unwrap();

        let batches = vec![
            vec![row(&["INV-1", "2026-04-01", "Ravi", "", "", "A", "Exide EPIQ", "Exide", "EPIQ", "1", "118", "PAID"])],
            vec![row(&["INV-1", "2026-04-02", "Sita", "", "", "B", "Exide EPIQ", "Exide", "EPIQ", "1", "236", "NOT_PAID"])],
        ];
        let invoices = invoices_from_batches(&batches, &stock);

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].customer_name, "Ravi");
        assert_eq!(invoices[0].items.len(), 1);
        assert_eq!(invoices[0].total_amount, Money::from_rupees(118));
        assert_eq!(invoices[1].customer_name, "Sita");
        assert_eq!(invoices[1].items.len(), 1);
        assert_eq!(invoices[1].total_amount, Money::from_rupees(236));
    }

    #[test]
    fn test_same_number_split_by_other_rows_is_two_invoices() {
        let stock = StockLedger::new();
        let rows = vec![
            row(&["INV-1", "2026-04-01", "Ravi", "", "", "A", "X", "X", "X", "1", "118", "PAID"]),
            row(&["INV-2", "2026-04-01", "Mohan", "", "", "C", "X", "X", "X", "1", "118", "PAID"]),
            row(&["INV-1", "2026-04-02", "Sita", "", "", "B", "X", "X", "X", "1", "236", "PAID"]),
        ];
        let invoices = invoices_from_batches(&[rows], &stock);

        let customers: Vec<_> = invoices.iter().map(|i| i.customer_name.as_str()).collect();
        assert_eq!(customers, ["Ravi", "Mohan", "Sita"]);
    }

    #[test]
    fn test_invoice_rows_skip_blank_numbers() {
        let invoices = invoices_from_batches(&[vec![row(&["", "2026-04-01"])]], &StockLedger::new());
        assert!(invoices.is_empty());
    }
}
