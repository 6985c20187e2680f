//! # Printable Invoice
//!
//! Everything a tax invoice printout needs, computed up front so the
//! renderer only formats.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ TAX INVOICE / ORIGINAL        Invoice No.    │  company + header
//! │ BILL TO            SHIP TO                   │  customer
//! │ S.NO │ ITEMS │ HSN │ QTY │ RATE │ DISC │ AMT │  invoice.items
//! │                        CGST @9%      ₹x      │  cgst_rate
//! │                        SGST @9%      ₹x      │  sgst_rate
//! │ HSN/SAC │ Taxable │ CGST │ SGST │ Total Tax  │  tax_breakdown
//! │ Total Amount (in words): ... Rupees          │  amount_in_words
//! │ Bank Details │ Terms │ Authorised Signatory  │  company + terms
//! └──────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::tax::tax_breakdown;
use crate::types::{GstRate, Invoice, TaxBreakdownRow};
use crate::words::amount_in_words;

/// The seller block printed on every invoice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub gstin: String,
    pub pan: String,
    pub mobile: String,
    pub email: String,
    pub bank_name: String,
    pub account_no: String,
    pub ifsc_code: String,
    /// Court named in the terms, e.g. `INDORE`.
    pub jurisdiction: String,
}

impl CompanyDetails {
    /// The fixed terms and conditions block.
    pub fn terms(&self) -> Vec<String> {
        vec![
            "Goods once sold will not be taken back or exchanged".to_string(),
            format!("Subject to {} jurisdiction", self.jurisdiction),
            "Guarantee as per company rules".to_string(),
            "In case of damage or without guarantee card no replacement".to_string(),
        ]
    }
}

/// An invoice with its derived print data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrintableInvoice {
    pub company: CompanyDetails,
    pub invoice: Invoice,

    /// Half the first line's GST rate; labels the CGST total row.
    #[ts(type = "number")]
    pub cgst_rate: GstRate,
    #[ts(type = "number")]
    pub sgst_rate: GstRate,

    pub tax_breakdown: Vec<TaxBreakdownRow>,

    /// `"One Hundred Eighteen Rupees"`.
    pub amount_in_words: String,

    pub terms: Vec<String>,
}

impl PrintableInvoice {
    /// Derives the print data for an invoice.
    ///
    /// ## Errors
    /// `InvalidInput` if the total is too large to write in words.
    pub fn prepare(invoice: &Invoice, company: &CompanyDetails) -> CoreResult<Self> {
        let split = invoice
            .items
            .first()
            .map(|line| line.gst_percent)
            .unwrap_or_default()
            .half();

        Ok(Self {
            company: company.clone(),
            invoice: invoice.clone(),
            cgst_rate: split,
            sgst_rate: split,
            tax_breakdown: tax_breakdown(&invoice.items),
            amount_in_words: amount_in_words(invoice.total_amount)?,
            terms: company.terms(),
        })
    }
}
