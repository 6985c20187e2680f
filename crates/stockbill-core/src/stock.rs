//! # Stock Ledger
//!
//! The in-memory set of serialized stock units.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockLedger                                                            │
//! │                                                                         │
//! │   items: Vec<StockItem>          index: HashMap<serial, position>       │
//! │   ┌────┬────┬────┬────┐          ┌──────────┬───┐                       │
//! │   │ 0  │ 1  │ 2  │ 3  │ ◄─────── │ "EX-101" │ 0 │                       │
//! │   └────┴────┴────┴────┘          │ "AM-7"   │ 1 │                       │
//! │   insertion order = list order   │  ...     │   │                       │
//! │                                  └──────────┴───┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - A serial number is added at most once; duplicates are rejected
//! - Items are never removed, only flipped to sold
//! - Every operation either fully applies or leaves the ledger unchanged
//!
//! The ledger does not persist itself. Callers stage mutations on a clone,
//! write it out, then swap it in.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{StockItem, StockSummary};
use crate::validation::validate_non_negative;

/// Serialized inventory, keyed by serial number.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    items: Vec<StockItem>,
    index: HashMap<String, usize>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted rows.
    ///
    /// Stored data may already hold duplicate serials. They are kept so the
    /// sheet round-trips, but lookups resolve to the first occurrence.
    pub fn restore(items: Vec<StockItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.contains_key(&item.serial_no) {
                warn!(serial_no = %item.serial_no, "Duplicate serial number in stored stock");
                continue;
            }
            index.insert(item.serial_no.clone(), position);
        }
        Self { items, index }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All items in insertion order.
    pub fn list(&self) -> &[StockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, serial_no: &str) -> Option<&StockItem> {
        self.index.get(serial_no).map(|&i| &self.items[i])
    }

    pub fn contains(&self, serial_no: &str) -> bool {
        self.index.contains_key(serial_no)
    }

    /// Counts for the dashboard. The value saturates rather than wrap.
    pub fn summary(&self) -> StockSummary {
        let sold_items = self.items.iter().filter(|i| i.sold).count();
        let available_value = self
            .items
            .iter()
            .filter(|i| !i.sold)
            .fold(Money::zero(), |acc, i| acc.saturating_add(i.sale_price));

        StockSummary {
            total_items: self.items.len(),
            available_items: self.items.len() - sold_items,
            sold_items,
            available_value,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one item.
    ///
    /// ## Errors
    /// - `Validation` for an empty serial or a negative price
    /// - `DuplicateKey` when the serial is already in stock
    pub fn add(&mut self, item: StockItem) -> CoreResult<StockItem> {
        check_item(&item)?;
        if self.contains(&item.serial_no) {
            return Err(CoreError::DuplicateKey {
                serial_no: item.serial_no,
            });
        }

        self.push(item.clone());
        Ok(item)
    }

    /// Adds a batch, all or nothing.
    ///
    /// The whole batch is rejected with `DuplicateKey` if any serial is
    /// already in stock or appears twice in the batch.
    pub fn add_bulk(&mut self, items: Vec<StockItem>) -> CoreResult<Vec<StockItem>> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            check_item(item)?;
            if self.contains(&item.serial_no) || !seen.insert(item.serial_no.as_str()) {
                return Err(CoreError::DuplicateKey {
                    serial_no: item.serial_no.clone(),
                });
            }
        }

        for item in &items {
            self.push(item.clone());
        }
        Ok(items)
    }

    /// Marks one item sold. Marking a sold item again is not an error.
    pub fn mark_sold(&mut self, serial_no: &str) -> CoreResult<()> {
        let position = *self
            .index
            .get(serial_no)
            .ok_or_else(|| CoreError::NotFound(serial_no.to_string()))?;
        self.items[position].mark_sold();
        Ok(())
    }

    /// Dry run for an invoice: every serial exists, is unsold, and is
    /// listed once.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown serial
    /// - `Validation(AlreadySold)` for a sold one
    /// - `Validation(Duplicate)` for a serial listed twice
    pub fn check_sellable<S: AsRef<str>>(&self, serials: &[S]) -> CoreResult<()> {
        let mut seen = HashSet::with_capacity(serials.len());
        for serial in serials {
            let serial = serial.as_ref();
            if !seen.insert(serial) {
                return Err(ValidationError::Duplicate {
                    field: "serialNo".to_string(),
                    value: serial.to_string(),
                }
                .into());
            }
            let item = self
                .get(serial)
                .ok_or_else(|| CoreError::NotFound(serial.to_string()))?;
            if item.sold {
                return Err(ValidationError::AlreadySold {
                    serial_no: serial.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Marks every serial sold, or none of them.
    pub fn mark_all_sold<S: AsRef<str>>(&mut self, serials: &[S]) -> CoreResult<()> {
        self.check_sellable(serials)?;
        for serial in serials {
            self.mark_sold(serial.as_ref())?;
        }
        Ok(())
    }

    fn push(&mut self, item: StockItem) {
        self.index.insert(item.serial_no.clone(), self.items.len());
        self.items.push(item);
    }
}

fn check_item(item: &StockItem) -> CoreResult<()> {
    if item.serial_no.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "serialNo".to_string(),
        }
        .into());
    }
    validate_non_negative("salePrice", item.sale_price)?;
    validate_non_negative("purchasePrice", item.purchase_price)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
