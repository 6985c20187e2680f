//! # Invoice Printout
//!
//! Renders a [`PrintableInvoice`] through `templates/invoice.html` as a
//! self-contained HTML page, ready for the browser's print dialog. All
//! figures come precomputed; the template only lays them out, and askama
//! escapes every interpolated value.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use stockbill_core::{CompanyDetails, GstRate, Invoice, PrintableInvoice, TaxBreakdownRow};

use crate::error::ApiError;

/// The tax invoice page.
#[derive(Debug, Template)]
#[template(path = "invoice.html")]
pub struct InvoicePage {
    pub company: CompanyDetails,
    pub invoice: Invoice,
    pub cgst_rate: GstRate,
    pub sgst_rate: GstRate,
    pub tax_breakdown: Vec<TaxBreakdownRow>,
    pub amount_in_words: String,
    pub terms: Vec<String>,
}

impl From<PrintableInvoice> for InvoicePage {
    fn from(doc: PrintableInvoice) -> Self {
        InvoicePage {
            company: doc.company,
            invoice: doc.invoice,
            cgst_rate: doc.cgst_rate,
            sgst_rate: doc.sgst_rate,
            tax_breakdown: doc.tax_breakdown,
            amount_in_words: doc.amount_in_words,
            terms: doc.terms,
        }
    }
}

impl IntoResponse for InvoicePage {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => ApiError::Template(err).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbill_core::invoice::assemble;
    use stockbill_core::tax::line_from_stock;
    use stockbill_core::validation::InvoiceHeader;
    use stockbill_core::{Money, PaymentStatus, StockItem, STATUS_AVAILABLE};

    fn page() -> InvoicePage {
        let item = StockItem {
            serial_no: "EX-<9>".to_string(),
            date: "2026-01-01".to_string(),
            brand: "Exide".to_string(),
            model: "Inva Master".to_string(),
            purchase_price: Money::zero(),
            sale_price: Money::from_rupees(118),
            gst_percent: GstRate::from_bps(1800),
            hsn: String::new(),
            status: STATUS_AVAILABLE.to_string(),
            sold: false,
        };
        let header = InvoiceHeader {
            invoice_no: "INV-7".to_string(),
            invoice_date: "2026-02-01".to_string(),
            customer_name: "Ravi & Sons".to_string(),
            customer_gstin: String::new(),
            customer_place: "Indore".to_string(),
            customer_mobile: "98260".to_string(),
            payment_status: PaymentStatus::Paid,
        };
        let invoice = assemble(header, vec![line_from_stock(&item, None, None, None).unwrap()])
            .unwrap();
        let company = CompanyDetails {
            name: "Volt House".to_string(),
            jurisdiction: "INDORE".to_string(),
            ..Default::default()
        };
        PrintableInvoice::prepare(&invoice, &company).unwrap().into()
    }

    #[test]
    fn test_render_contains_figures() {
        let html = page().render().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Invoice INV-7"));
        assert!(html.contains("CGST @9%"));
        assert!(html.contains("SGST @9%"));
        assert!(html.contains("₹118.00"));
        assert!(html.contains("₹100.00"));
        assert!(html.contains("One Hundred Eighteen Rupees"));
        assert!(html.contains("Subject to INDORE jurisdiction"));
        assert!(html.contains("85072000"));
        assert!(html.contains("PAID"));
        assert!(html.contains("Volt House"));
    }

    #[test]
    fn test_render_escapes_user_text() {
        let html = page().render().unwrap();
        assert!(html.contains("Ravi &amp; Sons"));
        assert!(html.contains("SN: EX-&lt;9&gt;"));
        assert!(!html.contains("EX-<9>"));
    }

    #[test]
    fn test_page_responds_as_html() {
        let response = page().into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let content_type = response.headers()[axum::http::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));
    }
}
