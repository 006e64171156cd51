//! Custom error types for spendlog
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for spendlog operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount input that cannot be parsed as an exact decimal
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Date input that matches none of the accepted formats
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Persisted dataset that cannot be parsed as the expected structure
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Entity lookup miss (id prefix, category name, ...)
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// File I/O errors (disk write, rename, read failures)
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors for inputs other than amounts and dates
    #[error("Validation error: {0}")]
    Validation(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation-class error (recoverable at the prompt)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_) | Self::InvalidDate(_) | Self::Validation(_)
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for spendlog operations
pub type LedgerResult<T> = Result<T, LedgerError>;
