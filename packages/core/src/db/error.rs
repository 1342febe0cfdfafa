//! Database Error Types
//!
//! Errors for store connection, initialization, queries and row decoding.
//! libsql-specific variants only exist with the `turso` feature.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a [`NodeStore`](crate::db::NodeStore) backend
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The libsql database could not be opened
    #[cfg(feature = "turso")]
    #[error("Failed to connect to database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// `numbers` table or index creation failed
    #[error("Failed to initialize database schema: {0}")]
    InitializationFailed(String),

    /// Database path not writable
    #[error("Permission denied for database path: {path}")]
    PermissionDenied { path: PathBuf },

    /// Creating the database directory failed
    #[error("Failed to create parent directory for database: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// Any other libsql failure
    #[cfg(feature = "turso")]
    #[error("Database operation failed: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// A statement failed, with what was being run
    #[error("SQL execution failed: {context}")]
    SqlExecutionError { context: String },

    /// A stored row could not be turned into a record
    #[error("Failed to decode row: {context}")]
    RowDecodingFailed { context: String },
}

impl DatabaseError {
    /// Opening the libsql database at `path` failed.
    #[cfg(feature = "turso")]
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    /// Table or index setup failed.
    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    /// The database file or its directory is not writable.
    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    /// A query or statement failed; `context` says which one.
    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }

    /// A `numbers` row had a missing or malformed column.
    pub fn row_decoding(context: impl Into<String>) -> Self {
        Self::RowDecodingFailed {
            context: context.into(),
        }
    }
}
