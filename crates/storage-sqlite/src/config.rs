//! Storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use steplog_core::errors::{Error, Result};

pub const DEFAULT_DB_FILE_NAME: &str = "activities.db";

/// Where the activity database lives and how connections to it are tuned.
///
/// The database is always a single file inside the application's private data
/// directory; there is no environment override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub app_data_dir: PathBuf,
    pub db_file_name: String,
    pub max_pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            app_data_dir: PathBuf::from("."),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            max_pool_size: 4,
            busy_timeout_ms: 30_000,
        }
    }
}

impl StorageConfig {
    pub fn new(app_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_data_dir: app_data_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_file_name.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "dbFileName must not be empty".to_string(),
            ));
        }
        if self.max_pool_size == 0 {
            return Err(Error::InvalidConfigValue(
                "maxPoolSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
