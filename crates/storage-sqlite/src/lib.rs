//! SQLite storage implementation for Steplog.
//!
//! This crate provides all database-related functionality using Diesel with SQLite.
//! It implements the store trait defined in `steplog-core` and contains:
//! - Database file setup and connection pooling
//! - The single-writer actor that serializes writes
//! - Schema creation for the `activities` table
//! - The activity store and its Diesel model types
//!
//! ```text
//!   core (ActivityListController)
//!              │
//!              ▼ ActivityStoreTrait
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!         activities.db
//! ```

pub mod activities;
pub mod config;
pub mod db;
pub mod errors;
pub mod schema;

pub use activities::SqliteActivityStore;
pub use config::StorageConfig;

// Re-export database utilities
pub use db::{
    create_pool, create_schema, get_connection, get_db_path, init, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

// Re-export from steplog-core for convenience
pub use steplog_core::errors::{DatabaseError, Error, Result};
