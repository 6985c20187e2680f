//! # Error Types
//!
//! Domain-specific error types for stockbill-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbill-core errors (this file)                                     │
//! │  ├── CoreError        - Ledger and calculator failures                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockbill-db errors (separate crate)                                  │
//! │  └── DbError          - Sheet store failures (PersistenceError)        │
//! │                                                                         │
//! │  HTTP errors (in apps/api)                                             │
//! │  └── ApiError         - What the web UI sees ({error, details})        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Browser                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the serial number or field name in the message
//! 3. A failed operation never leaves a ledger half-mutated

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Arithmetic input outside the calculator's domain.
    ///
    /// ## When This Occurs
    /// - Reverse GST with a zero rate or zero price
    /// - Number-to-words past the Billion scale
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A serial number is already present in stock.
    ///
    /// ## When This Occurs
    /// - Single add with a known serial
    /// - Bulk add where any serial collides with stock or with the batch itself
    #[error("Serial number {serial_no} already exists")]
    DuplicateKey { serial_no: String },

    /// No stock item carries this serial number.
    #[error("Stock item not found: {0}")]
    NotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any ledger is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A list that needs at least one entry was empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Value must be greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. a non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The same value appears twice where it must be unique.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// An invoice line names a serial that is not in stock.
    #[error("Serial number {serial_no} is not in stock")]
    UnknownSerial { serial_no: String },

    /// An invoice line names a serial that was already invoiced.
    #[error("Serial number {serial_no} is already sold")]
    AlreadySold { serial_no: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateKey {
            serial_no: "BAT-001".to_string(),
        };
        assert_eq!(err.to_string(), "Serial number BAT-001 already exists");

        let err = CoreError::NotFound("BAT-404".to_string());
        assert_eq!(err.to_string(), "Stock item not found: BAT-404");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customerName".to_string(),
        };
        assert_eq!(err.to_string(), "customerName is required");

        let err = ValidationError::AlreadySold {
            serial_no: "BAT-001".to_string(),
        };
        assert_eq!(err.to_string(), "Serial number BAT-001 is already sold");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Empty {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: items must not be empty"
        );
    }
}
