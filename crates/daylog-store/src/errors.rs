//! Error types for the store.
//!
//! [`StoreError`] is returned by every repository and service operation.
//! Missing records get their own variants so callers can map them to a
//! request-level failure without string matching.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which statement failed and why.
        message: String,
    },

    /// Referenced template does not exist.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Referenced daily log does not exist.
    #[error("daily log not found: {0}")]
    LogNotFound(String),

    /// Referenced log entry does not exist.
    #[error("log entry not found: {0}")]
    EntryNotFound(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
