//! Core error types for Steplog.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::num::ParseIntError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the activity log.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Activity list error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Database-agnostic error type for storage operations.
///
/// Every store failure lands in one of three buckets so callers can decide
/// whether the store is usable at all, or only the last read/write failed.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The backing file could not be opened or the schema could not be created.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A read failed. In-memory state is left as it was.
    #[error("Storage read failed: {0}")]
    StorageRead(String),

    /// A write failed. Nothing was persisted.
    #[error("Storage write failed: {0}")]
    StorageWrite(String),
}

/// Errors raised by the activity list controller itself.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Activity list has not been activated yet")]
    NotReady,

    #[error("Activity list failed to initialize: {0}")]
    Failed(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseIntError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the error came from the store being unreachable rather than
    /// from a single failed statement.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::StorageUnavailable(_)))
    }
}
