//! # Application State
//!
//! The ledgers live behind one async mutex, the single writer for stock and
//! invoices. Every mutation is write-through:
//!
//! ```text
//! lock ──► clone ledger ──► mutate clone ──► persist clone ──► swap in ──► unlock
//!                                 │                 │
//!                                 ▼                 ▼
//!                            400, nothing     500, nothing
//!                              changed          changed
//! ```
//!
//! Readers take the same lock briefly and copy out what they need.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use stockbill_core::{
    CompanyDetails, CreateInvoiceRequest, Invoice, InvoiceLedger, StockItem, StockLedger,
    StockSummary,
};
use stockbill_db::{DbResult, PersistenceHealth, Persister};

use crate::error::{ApiError, ApiResult};

/// Both ledgers, mutated together.
#[derive(Debug, Default)]
pub struct Ledgers {
    pub stock: StockLedger,
    pub invoices: InvoiceLedger,
}

/// What `/api/health` reports.
#[derive(Debug, Clone)]
pub struct HealthSnapshot {
    pub stock_items: usize,
    pub invoices: usize,
    pub persistence: PersistenceHealth,
    pub database_reachable: bool,
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    ledgers: Arc<Mutex<Ledgers>>,
    persister: Persister,
    company: Arc<CompanyDetails>,
}

impl AppState {
    pub fn new(ledgers: Ledgers, persister: Persister, company: CompanyDetails) -> Self {
        AppState {
            ledgers: Arc::new(Mutex::new(ledgers)),
            persister,
            company: Arc::new(company),
        }
    }

    /// Builds the state from whatever the sheets hold.
    pub async fn load(persister: Persister, company: CompanyDetails) -> DbResult<Self> {
        let (stock, invoices) = persister.load().await?;
        Ok(Self::new(Ledgers { stock, invoices }, persister, company))
    }

    pub fn company(&self) -> &CompanyDetails {
        &self.company
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn stock(&self) -> Vec<StockItem> {
        self.ledgers.lock().await.stock.list().to_vec()
    }

    pub async fn stock_summary(&self) -> StockSummary {
        self.ledgers.lock().await.stock.summary()
    }

    pub async fn invoices(&self) -> Vec<Invoice> {
        self.ledgers.lock().await.invoices.list().to_vec()
    }

    pub async fn find_invoice(&self, invoice_no: &str) -> Option<Invoice> {
        self.ledgers.lock().await.invoices.find(invoice_no).cloned()
    }

    /// Ledger sizes, the last write outcome and a live store check.
    pub async fn health(&self) -> HealthSnapshot {
        let (stock_items, invoices) = {
            let ledgers = self.ledgers.lock().await;
            (ledgers.stock.len(), ledgers.invoices.len())
        };
        HealthSnapshot {
            stock_items,
            invoices,
            persistence: self.persister.health().await,
            database_reachable: self.persister.is_reachable().await,
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Adds one item and rewrites the stock sheet.
    pub async fn add_stock(&self, item: StockItem) -> ApiResult<StockItem> {
        let mut ledgers = self.ledgers.lock().await;

        let mut staged = ledgers.stock.clone();
        let added = staged.add(item)?;
        self.persister.save_stock(&staged).await?;
        ledgers.stock = staged;

        info!(serial_no = %added.serial_no, "Stock item added");
        Ok(added)
    }

    /// Adds a batch, all or nothing, and rewrites the stock sheet.
    pub async fn add_stock_bulk(&self, items: Vec<StockItem>) -> ApiResult<Vec<StockItem>> {
        if items.is_empty() {
            return Err(ApiError::NoValidItems);
        }
        let mut ledgers = self.ledgers.lock().await;

        let mut staged = ledgers.stock.clone();
        let added = staged.add_bulk(items)?;
        self.persister.save_stock(&staged).await?;
        ledgers.stock = staged;

        info!(count = added.len(), "Stock items added in bulk");
        Ok(added)
    }

    /// Creates an invoice, marks its serials sold, and persists both sheets.
    ///
    /// The stock sheet is written first. If the invoice rows then fail to
    /// append, the previous stock rows are written back.
    pub async fn create_invoice(
        &self,
        request: &CreateInvoiceRequest,
        today: &str,
    ) -> ApiResult<Invoice> {
        let mut ledgers = self.ledgers.lock().await;

        let mut staged_stock = ledgers.stock.clone();
        let mut staged_invoices = ledgers.invoices.clone();
        let invoice = staged_invoices
            .create(request, &mut staged_stock, today)
            .map_err(ApiError::InvoiceRejected)?;

        self.persister.save_stock(&staged_stock).await?;
        if let Err(err) = self.persister.append_invoice(&invoice).await {
            warn!(invoice_no = %invoice.invoice_no, "Invoice rows not saved, restoring stock sheet");
            if let Err(restore) = self.persister.save_stock(&ledgers.stock).await {
                error!(error = %restore, "Stock sheet restore failed, sheet shows unsold items as SOLD");
            }
            return Err(err.into());
        }

        ledgers.stock = staged_stock;
        ledgers.invoices = staged_invoices;

        info!(
            invoice_no = %invoice.invoice_no,
            lines = invoice.items.len(),
            total = %invoice.total_amount,
            "Invoice created"
        );
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stockbill_core::{GstRate, InvoiceLineRequest, Money, STATUS_AVAILABLE};
    use stockbill_db::{DbError, MemorySheets, RetryPolicy, Row, Sheet, SheetStore};

    /// Stock writes go through; invoice appends always fail.
    #[derive(Debug, Clone)]
    struct AppendFails(MemorySheets);

    #[async_trait]
    impl SheetStore for AppendFails {
        async fn list_batches(&self, sheet: Sheet) -> DbResult<Vec<Vec<Row>>> {
            self.0.list_batches(sheet).await
        }

        async fn replace_all(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()> {
            self.0.replace_all(sheet, rows).await
        }

        async fn append_rows(&self, _sheet: Sheet, _rows: &[Row]) -> DbResult<()> {
            Err(DbError::Unavailable("appends disabled".to_string()))
        }

        async fn ping(&self) -> DbResult<()> {
            self.0.ping().await
        }
    }

    fn item(serial: &str) -> StockItem {
        StockItem {
            serial_no: serial.to_string(),
            date: "2026-01-05".to_string(),
            brand: "Exide".to_string(),
            model: "EPIQ".to_string(),
            purchase_price: Money::zero(),
            sale_price: Money::from_rupees(118),
            gst_percent: GstRate::from_bps(1800),
            hsn: String::new(),
            status: STATUS_AVAILABLE.to_string(),
            sold: false,
        }
    }

    fn request(serial: &str) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            invoice_no: Some("INV-1".to_string()),
            customer_name: Some("Ravi".to_string()),
            items: vec![InvoiceLineRequest {
                serial_no: Some(serial.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_invoice_commits_after_both_writes() {
        let sheets = MemorySheets::new();
        let persister = Persister::new(Arc::new(sheets.clone()), RetryPolicy::none());
        let state = AppState::new(Ledgers::default(), persister, CompanyDetails::default());

        state.add_stock(item("EX-1")).await.unwrap();
        let invoice = state.create_invoice(&request("EX-1"), "2026-04-01").await.unwrap();

        assert_eq!(invoice.invoice_date, "2026-04-01");
        assert!(state.stock().await[0].sold);
        assert_eq!(state.invoices().await.len(), 1);
        assert_eq!(sheets.list_all(Sheet::Invoices).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_append_restores_stock_sheet() {
        let sheets = MemorySheets::new();
        let persister = Persister::new(Arc::new(AppendFails(sheets.clone())), RetryPolicy::none());
        let state = AppState::new(Ledgers::default(), persister, CompanyDetails::default());
        state.add_stock(item("EX-1")).await.unwrap();

        let err = state
            .create_invoice(&request("EX-1"), "2026-04-01")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Persistence(_)));

        assert!(!state.stock().await[0].sold);
        assert!(state.invoices().await.is_empty());
        let stock_rows = sheets.list_all(Sheet::Stock).await.unwrap();
        assert_eq!(stock_rows[0][8], "");
    }

    #[tokio::test]
    async fn test_bulk_without_items_is_rejected() {
        let persister = Persister::new(Arc::new(MemorySheets::new()), RetryPolicy::none());
        let state = AppState::new(Ledgers::default(), persister, CompanyDetails::default());
        assert!(matches!(
            state.add_stock_bulk(Vec::new()).await,
            Err(ApiError::NoValidItems)
        ));
    }
}
