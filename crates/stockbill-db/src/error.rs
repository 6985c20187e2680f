//! # Storage Error Types
//!
//! Error types for sheet persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      MemorySheets fail switch              │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  DbError (this module) ← categorized, is_retryable()                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Persister retries transient errors with backoff                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError::PersistenceFailed ← retry budget spent                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (500 {error, details})                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Sheet store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite reported the database busy or locked.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The store refused the operation (in-memory fail switch, closed pool).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded.
    #[error("Bad row {row} in sheet {sheet}: {reason}")]
    Codec {
        sheet: String,
        row: usize,
        reason: String,
    },

    /// A write kept failing until the retry budget ran out.
    #[error("Persistence failed during {operation} after {attempts} attempts: {message}")]
    PersistenceFailed {
        operation: String,
        attempts: u32,
        message: String,
    },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether trying the same operation again could succeed.
    ///
    /// ```text
    /// Busy, PoolExhausted, ConnectionFailed, Unavailable  → retry
    /// Codec, MigrationFailed, QueryFailed, ...            → give up
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DbError::Busy(_)
                | DbError::PoolExhausted
                | DbError::ConnectionFailed(_)
                | DbError::Unavailable(_)
        )
    }

    pub fn codec(sheet: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        DbError::Codec {
            sheet: sheet.into(),
            row,
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database "locked"/"busy"  → DbError::Busy
/// sqlx::Error::Database (other)          → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut              → DbError::PoolExhausted
/// sqlx::Error::PoolClosed                → DbError::Unavailable
/// sqlx::Error::Io                        → DbError::ConnectionFailed
/// Other                                  → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("database is locked") || msg.contains("busy") {
                    DbError::Busy(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::Unavailable("Pool is closed".to_string()),

            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Internal(format!("cell encoding: {}", err))
    }
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DbError::Busy("database is locked".into()).is_retryable());
        assert!(DbError::PoolExhausted.is_retryable());
        assert!(DbError::Unavailable("down".into()).is_retryable());
        assert!(!DbError::codec("Stock", 3, "bad").is_retryable());
        assert!(!DbError::MigrationFailed("x".into()).is_retryable());
    }

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::Unavailable(_)
        ));
    }

    #[test]
    fn test_persistence_failed_message() {
        let err = DbError::PersistenceFailed {
            operation: "replace Stock".into(),
            attempts: 4,
            message: "Store unavailable: down".into(),
        };
        assert_eq!(
            err.to_string(),
            "Persistence failed during replace Stock after 4 attempts: Store unavailable: down"
        );
    }
}
