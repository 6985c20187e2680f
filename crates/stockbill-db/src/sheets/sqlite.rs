//! # SQLite Sheets
//!
//! Sheets stored in two tables (see `migrations/sqlite/001_sheets.sql`).
//!
//! ## Write Path
//! ```text
//! replace_all(Stock, rows)
//!      │
//!      ▼
//! BEGIN
//!   INSERT OR IGNORE INTO sheets       ← header row recorded once
//!   DELETE FROM sheet_rows WHERE sheet = 'Stock'
//!   INSERT INTO sheet_rows ... × N      ← ids keep insertion order,
//!                                         one batch number per write
//! COMMIT                                ← readers never see a half sheet
//! ```

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::{Row, Sheet, SheetStore};
use crate::error::{DbError, DbResult};

/// Sheets in SQLite.
///
/// ## Usage
/// ```rust,ignore
/// let sheets = db.sheets();
/// sheets.append_rows(Sheet::Invoices, &rows).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteSheets {
    pool: SqlitePool,
}

impl SqliteSheets {
    /// Creates a new SqliteSheets over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSheets { pool }
    }

    /// The header row recorded for a sheet, if it was ever written.
    pub async fn headers(&self, sheet: Sheet) -> DbResult<Option<Vec<String>>> {
        let headers: Option<String> =
            sqlx::query_scalar("SELECT headers FROM sheets WHERE name = ?")
                .bind(sheet.name())
                .fetch_optional(&self.pool)
                .await?;

        headers
            .map(|h| serde_json::from_str(&h).map_err(DbError::from))
            .transpose()
    }

    async fn ensure_sheet(tx: &mut Transaction<'_, Sqlite>, sheet: Sheet) -> DbResult<()> {
        let headers = serde_json::to_string(sheet.headers())?;
        sqlx::query("INSERT OR IGNORE INTO sheets (name, headers) VALUES (?, ?)")
            .bind(sheet.name())
            .bind(headers)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Writes `rows` under the sheet's next batch number.
    async fn insert_rows(
        tx: &mut Transaction<'_, Sqlite>,
        sheet: Sheet,
        rows: &[Row],
    ) -> DbResult<()> {
        let batch: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(batch), 0) + 1 FROM sheet_rows WHERE sheet = ?")
                .bind(sheet.name())
                .fetch_one(&mut **tx)
                .await?;

        for row in rows {
            let cells = serde_json::to_string(row)?;
            sqlx::query("INSERT INTO sheet_rows (sheet, batch, cells) VALUES (?, ?, ?)")
                .bind(sheet.name())
                .bind(batch)
                .bind(cells)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SheetStore for SqliteSheets {
    async fn list_batches(&self, sheet: Sheet) -> DbResult<Vec<Vec<Row>>> {
        let encoded: Vec<(i64, String)> =
            sqlx::query_as("SELECT batch, cells FROM sheet_rows WHERE sheet = ? ORDER BY id")
                .bind(sheet.name())
                .fetch_all(&self.pool)
                .await?;

        let mut batches: Vec<Vec<Row>> = Vec::new();
        let mut current = None;
        for (i, (batch, cells)) in encoded.iter().enumerate() {
            let row = serde_json::from_str::<Row>(cells)
                .map_err(|e| DbError::codec(sheet.name(), i + 1, e.to_string()))?;
            match batches.last_mut() {
                Some(rows) if current == Some(*batch) => rows.push(row),
                _ => batches.push(vec![row]),
            }
            current = Some(*batch);
        }
        Ok(batches)
    }

    async fn replace_all(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_sheet(&mut tx, sheet).await?;

        sqlx::query("DELETE FROM sheet_rows WHERE sheet = ?")
            .bind(sheet.name())
            .execute(&mut *tx)
            .await?;
        Self::insert_rows(&mut tx, sheet, rows).await?;

        tx.commit().await?;
        debug!(sheet = %sheet, rows = rows.len(), "Sheet replaced");
        Ok(())
    }

    async fn append_rows(&self, sheet: Sheet, rows: &[Row]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_sheet(&mut tx, sheet).await?;
        Self::insert_rows(&mut tx, sheet, rows).await?;

        tx.commit().await?;
        debug!(sheet = %sheet, rows = rows.len(), "Rows appended");
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
