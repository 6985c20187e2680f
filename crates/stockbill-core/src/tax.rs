//! # GST Calculator
//!
//! Reverse GST and invoice totals.
//!
//! ## Inclusive Pricing
//! Shop prices already include GST. The taxable value is recovered by
//! dividing it back out, and the tax is whatever is left over.
//! ```text
//!   rate (incl. GST) = ₹118.00          gst = 18%
//!          │
//!          ▼  taxable = rate × 10000 / (10000 + bps), rounded half-up
//!   amount (excl.)   = ₹100.00
//!          │
//!          ▼  tax = rate - amount
//!   tax              = ₹18.00  ──►  CGST ₹9.00 + SGST ₹9.00
//! ```
//!
//! All arithmetic runs in paise with i128 intermediates, so no step can
//! overflow or pick up float error.

use crate::error::{CoreError, CoreResult};
use crate::money::{div_round_half_up, Money};
use crate::types::{GstRate, InvoiceLineItem, InvoiceTotals, StockItem, TaxBreakdownRow};
use crate::DEFAULT_HSN;

const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Line Calculations
// =============================================================================

/// Computes the taxable value inside a GST-inclusive price.
///
/// ## Errors
/// `InvalidInput` when `rate <= 0` or the GST rate is zero.
///
/// ## Example
/// ```rust
/// use stockbill_core::money::Money;
/// use stockbill_core::tax::taxable_from_inclusive;
/// use stockbill_core::types::GstRate;
///
/// let amount = taxable_from_inclusive(Money::from_rupees(118), GstRate::from_bps(1800)).unwrap();
/// assert_eq!(amount, Money::from_rupees(100));
/// ```
pub fn taxable_from_inclusive(rate: Money, gst: GstRate) -> CoreResult<Money> {
    if !rate.is_positive() {
        return Err(CoreError::invalid_input(format!(
            "rate must be positive, got {}",
            rate
        )));
    }
    if gst.is_zero() {
        return Err(CoreError::invalid_input("GST percent must be positive"));
    }

    let numerator = rate.paise() as i128 * BPS_SCALE;
    let denominator = BPS_SCALE + gst.bps() as i128;
    Ok(Money::from_paise(
        div_round_half_up(numerator, denominator) as i64,
    ))
}

/// Builds an invoice line for one stock unit.
///
/// Rate, GST and HSN fall back to the stock item's values; an empty HSN
/// falls back once more to [`DEFAULT_HSN`].
pub fn line_from_stock(
    stock: &StockItem,
    rate: Option<Money>,
    gst: Option<GstRate>,
    hsn: Option<&str>,
) -> CoreResult<InvoiceLineItem> {
    let rate = rate.unwrap_or(stock.sale_price);
    let gst_percent = gst.unwrap_or(stock.gst_percent);
    let amount = taxable_from_inclusive(rate, gst_percent)?;

    let hsn = [hsn.unwrap_or(""), stock.hsn.as_str()]
        .into_iter()
        .map(str::trim)
        .find(|h| !h.is_empty())
        .unwrap_or(DEFAULT_HSN)
        .to_string();

    Ok(InvoiceLineItem {
        serial_no: stock.serial_no.clone(),
        item_name: stock.item_name(),
        brand: stock.brand.clone(),
        model: stock.model.clone(),
        hsn,
        qty: 1,
        rate,
        discount: Money::zero(),
        gst_percent,
        amount,
    })
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Sums an invoice.
///
/// CGST and SGST are each half the total tax, rounded independently, so
/// their sum may exceed the tax by one paisa. The split is flat 50/50
/// whatever each line's own rate is.
///
/// ## Errors
/// `InvalidInput` if a sum does not fit in paise.
///
/// ## Example
/// ```rust
/// use stockbill_core::tax::aggregate_totals;
///
/// let totals = aggregate_totals(&[]).unwrap();
/// assert!(totals.total_amount.is_zero());
/// ```
pub fn aggregate_totals(lines: &[InvoiceLineItem]) -> CoreResult<InvoiceTotals> {
    let (total_amount, taxable_amount, total_tax) = lines
        .iter()
        .try_fold(
            (Money::zero(), Money::zero(), Money::zero()),
            |(total, taxable, tax), line| {
                Some((
                    total.checked_add(line.rate)?,
                    taxable.checked_add(line.amount)?,
                    tax.checked_add(line.tax())?,
                ))
            },
        )
        .ok_or_else(|| CoreError::invalid_input("invoice total is out of range"))?;

    Ok(InvoiceTotals {
        taxable_amount,
        cgst_amount: total_tax.half(),
        sgst_amount: total_tax.half(),
        total_amount,
    })
}

/// Per-line HSN summary for the printed invoice.
///
/// Each half is `amount × (gst / 2) / 100` and the total is
/// `amount × gst / 100`, each rounded half-up on its own.
pub fn tax_breakdown(lines: &[InvoiceLineItem]) -> Vec<TaxBreakdownRow> {
    lines
        .iter()
        .map(|line| {
            let amount = line.amount.paise() as i128;
            let bps = line.gst_percent.bps() as i128;
            let half_tax =
                Money::from_paise(div_round_half_up(amount * bps, 2 * BPS_SCALE) as i64);
            let total_tax = Money::from_paise(div_round_half_up(amount * bps, BPS_SCALE) as i64);

            TaxBreakdownRow {
                hsn: line.hsn.clone(),
                taxable_value: line.amount,
                cgst_rate: line.gst_percent.half(),
                cgst_amount: half_tax,
                sgst_rate: line.gst_percent.half(),
                sgst_amount: half_tax,
                total_tax,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STATUS_AVAILABLE;

    fn stock(serial: &str, price_paise: i64, gst_bps: u32) -> StockItem {
        StockItem {
            serial_no: serial.to_string(),
            date: "2026-01-01".to_string(),
            brand: "Exide".to_string(),
            model: "Mileage".to_string(),
            purchase_price: Money::zero(),
            sale_price: Money::from_paise(price_paise),
            gst_percent: GstRate::from_bps(gst_bps),
            hsn: String::new(),
            status: STATUS_AVAILABLE.to_string(),
            sold: false,
        }
    }

    #[test]
    fn test_taxable_from_inclusive_exact() {
        let amount = taxable_from_inclusive(Money::from_paise(11800), GstRate::from_bps(1800));
        assert_eq!(amount.unwrap().paise(), 10000);
    }

    #[test]
    fn test_taxable_from_inclusive_rounds_half_up() {
        // 100 / 1.18 = 84.745...
        let amount = taxable_from_inclusive(Money::from_rupees(100), GstRate::from_bps(1800));
        assert_eq!(amount.unwrap().paise(), 8475);

        // 105 / 1.05 = 100 exactly, 1 / 1.05 = 0.952...
        assert_eq!(
            taxable_from_inclusive(Money::from_rupees(105), GstRate::from_bps(500))
                .unwrap()
                .paise(),
            10000
        );
        assert_eq!(
            taxable_from_inclusive(Money::from_rupees(1), GstRate::from_bps(500))
                .unwrap()
                .paise(),
            95
        );
    }

    #[test]
    fn test_taxable_from_inclusive_rejects_bad_input() {
        assert!(matches!(
            taxable_from_inclusive(Money::zero(), GstRate::from_bps(1800)),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            taxable_from_inclusive(Money::from_paise(-1), GstRate::from_bps(1800)),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            taxable_from_inclusive(Money::from_rupees(118), GstRate::from_bps(0)),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_taxable_round_trip_within_a_paisa() {
        let rates = [1, 99, 100, 11800, 413_000, 999_999, 12_345_678];
        let gsts = [5, 250, 500, 1200, 1800, 2800];
        for &paise in &rates {
            for &bps in &gsts {
                let amount =
                    taxable_from_inclusive(Money::from_paise(paise), GstRate::from_bps(bps))
                        .unwrap();
                let back = amount.paise() as f64 * (1.0 + bps as f64 / 10_000.0);
                assert!(
                    (back - paise as f64).abs() <= 1.0,
                    "rate {} paise at {} bps came back as {}",
                    paise,
                    bps,
                    back
                );
            }
        }
    }

    #[test]
    fn test_aggregate_totals_empty_is_zero() {
        assert_eq!(aggregate_totals(&[]).unwrap(), InvoiceTotals::default());
    }

    #[test]
    fn test_aggregate_totals_single_line() {
        let line = line_from_stock(&stock("S1", 11800, 1800), None, None, None).unwrap();
        let totals = aggregate_totals(&[line]).unwrap();
        assert_eq!(totals.taxable_amount.paise(), 10000);
        assert_eq!(totals.cgst_amount.paise(), 900);
        assert_eq!(totals.sgst_amount.paise(), 900);
        assert_eq!(totals.total_amount.paise(), 11800);
    }

    #[test]
    fn test_aggregate_totals_independent_rounding() {
        // tax of ₹0.01 splits into ₹0.01 + ₹0.01
        let line = InvoiceLineItem {
            serial_no: "S1".to_string(),
            item_name: "A B".to_string(),
            brand: "A".to_string(),
            model: "B".to_string(),
            hsn: DEFAULT_HSN.to_string(),
            qty: 1,
            rate: Money::from_paise(101),
            discount: Money::zero(),
            gst_percent: GstRate::from_bps(1800),
            amount: Money::from_paise(100),
        };
        let totals = aggregate_totals(&[line]).unwrap();
        assert_eq!(totals.cgst_amount.paise(), 1);
        assert_eq!(totals.sgst_amount.paise(), 1);
        assert_eq!(totals.total_amount - totals.taxable_amount, Money::from_paise(1));
    }

    #[test]
    fn test_aggregate_totals_reports_overflow() {
        let huge = InvoiceLineItem {
            serial_no: "S1".to_string(),
            item_name: "A B".to_string(),
            brand: "A".to_string(),
            model: "B".to_string(),
            hsn: DEFAULT_HSN.to_string(),
            qty: 1,
            rate: Money::from_paise(5_000_000_000_000_000_000),
            discount: Money::zero(),
            gst_percent: GstRate::from_bps(1800),
            amount: Money::from_paise(4_237_288_135_593_220_339),
        };
        let mut other = huge.clone();
        other.serial_no = "S2".to_string();

        assert!(matches!(
            aggregate_totals(&[huge, other]),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_line_from_stock_fallbacks() {
        let mut item = stock("S1", 590000, 2800);
        let line = line_from_stock(&item, None, None, None).unwrap();
        assert_eq!(line.item_name, "Exide Mileage");
        assert_eq!(line.qty, 1);
        assert_eq!(line.discount, Money::zero());
        assert_eq!(line.hsn, DEFAULT_HSN);
        assert_eq!(line.rate, item.sale_price);
        assert_eq!(line.gst_percent.bps(), 2800);

        item.hsn = "85071000".to_string();
        let line = line_from_stock(&item, Some(Money::from_rupees(118)), Some(GstRate::from_bps(1800)), Some(" "))
            .unwrap();
        assert_eq!(line.hsn, "85071000");
        assert_eq!(line.amount, Money::from_rupees(100));

        let line = line_from_stock(&item, None, None, Some("99999999")).unwrap();
        assert_eq!(line.hsn, "99999999");
    }

    #[test]
    fn test_tax_breakdown() {
        let line = line_from_stock(&stock("S1", 11800, 1800), None, None, None).unwrap();
        let rows = tax_breakdown(&[line]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hsn, DEFAULT_HSN);
        assert_eq!(rows[0].taxable_value.paise(), 10000);
        assert_eq!(rows[0].cgst_rate.bps(), 900);
        assert_eq!(rows[0].cgst_amount.paise(), 900);
        assert_eq!(rows[0].sgst_amount.paise(), 900);
        assert_eq!(rows[0].total_tax.paise(), 1800);
    }
}
