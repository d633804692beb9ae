//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap Diesel-specific errors and convert
//! them to the database-agnostic error types defined in `steplog_core`.

use diesel::result::Error as DieselError;
use steplog_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `steplog_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database path is not valid UTF-8: {0}")]
    InvalidPath(String),

    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Writer actor unavailable: {0}")]
    WriterUnavailable(String),
}

impl StorageError {
    /// Reports the failure as the store being unusable.
    pub fn into_unavailable(self) -> Error {
        Error::Database(DatabaseError::StorageUnavailable(self.to_string()))
    }

    /// Reports the failure as a failed read.
    pub fn into_read(self) -> Error {
        Error::Database(DatabaseError::StorageRead(self.to_string()))
    }

    /// Reports the failure as a failed write.
    pub fn into_write(self) -> Error {
        Error::Database(DatabaseError::StorageWrite(self.to_string()))
    }
}

/// Default classification when the call site doesn't pick one.
impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(_)
            | StorageError::InvalidPath(_)
            | StorageError::ConnectionFailed(_)
            | StorageError::PoolError(_) => err.into_unavailable(),
            StorageError::QueryFailed(_) => err.into_read(),
            StorageError::WriterUnavailable(_) => err.into_write(),
        }
    }
}

/// Extension trait for easily converting Diesel Results to core Results.
///
/// Reads go through this; writes are classified by the writer handle.
pub trait IntoCore<T> {
    fn into_core(self) -> steplog_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> steplog_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into_read())
    }
}
