//! Process-local sheets.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Row, Sheet, SheetStore};
use crate::error::{DbError, DbResult};

/// Sheets held in memory.
///
/// Clones share the same data, so a test can keep a handle and inspect what
/// the service wrote. [`MemorySheets::fail_writes`] makes every write fail
/// with a retryable error, and [`SheetStore::ping`] report the store down,
/// until switched off.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    sheets: Arc<RwLock<HashMap<Sheet, Vec<Vec<Row>>>>>,
    failing: Arc<AtomicBool>,
    write_attempts: Arc<AtomicUsize>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given rows already stored, one batch per sheet, as
    /// if each sheet had been typed in by hand.
    pub fn with_rows(stock: Vec<Row>, invoices: Vec<Row>) -> Self {
        let mut sheets = HashMap::new();
        sheets.insert(Sheet::Stock, batch_of(stock));
        sheets.insert(Sheet::Invoices, batch_of(invoices));
        Self {
            sheets: Arc::new(RwLock::new(sheets)),
            ..Self::default()
        }
    }

    /// Turns write failures on or off.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of write calls seen, failed ones included.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> DbResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("memory sheets set to fail".to_string()));
        }
        Ok(())
    }
}

fn batch_of(rows: Vec<Row>) -> Vec<Vec<Row>> {
    if rows.is_empty() {
        Vec::new()
    } else {
        vec![rows]
    }
}

#[async_trait]
impl SheetStore for MemorySheets {
    async fn list_batches(&self, sheet: Sheet) -> DbResult<Vec<Vec<Row>>> {
        Ok(self
            .sheets
            .read()
            .await
            .get(&sheet)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_all(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()> {
        self.check_writable()?;
        self.sheets.write().await.insert(sheet, batch_of(rows.to_vec()));
        Ok(())
    }

    async fn append_rows(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()> {
        self.check_writable()?;
        self.sheets
            .write()
            .await
            .entry(sheet)
            .or_default()
            .extend(batch_of(rows.to_vec()));
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("memory sheets set to fail".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_replace_and_append() {
        let store = MemorySheets::new();
        assert!(store.list_all(Sheet::Stock).await.unwrap().is_empty());

        store
            .replace_all(Sheet::Stock, &[row(&["A"]), row(&["B"])])
            .await
            .unwrap();
        store.append_rows(Sheet::Stock, &[row(&["C"])]).await.unwrap();
        assert_eq!(store.list_all(Sheet::Stock).await.unwrap().len(), 3);

        assert_eq!(store.list_batches(Sheet::Stock).await.unwrap().len(), 2);

        store.replace_all(Sheet::Stock, &[row(&["Z"])]).await.unwrap();
        assert_eq!(
            store.list_batches(Sheet::Stock).await.unwrap(),
            vec![vec![row(&["Z"])]]
        );
        assert!(store.list_all(Sheet::Invoices).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fail_switch() {
        let store = MemorySheets::new();
        let observer = store.clone();
        store.fail_writes(true);

        let err = store.append_rows(Sheet::Invoices, &[row(&["1"])]).await;
        assert!(matches!(err, Err(DbError::Unavailable(_))));
        assert!(store.ping().await.is_err());
        assert!(observer.list_all(Sheet::Invoices).await.unwrap().is_empty());

        store.fail_writes(false);
        store.append_rows(Sheet::Invoices, &[row(&["1"])]).await.unwrap();
        store.ping().await.unwrap();
        assert_eq!(observer.list_all(Sheet::Invoices).await.unwrap().len(), 1);
        assert_eq!(observer.write_attempts(), 2);
    }
}
