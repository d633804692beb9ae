use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::config::StorageConfig;
use crate::errors::StorageError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub mod write_actor;
pub use write_actor::{spawn_writer, WriteHandle};

/// The one table. `AUTOINCREMENT` keeps ids from being handed out twice, even
/// after every row has been deleted.
const CREATE_ACTIVITIES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        steps INTEGER NOT NULL,
        date INTEGER NOT NULL
    );
";

pub fn get_db_path(config: &StorageConfig) -> PathBuf {
    config.app_data_dir.join(&config.db_file_name)
}

/// Prepares the database file and returns its path.
///
/// Creates the data directory when missing and switches the file to WAL.
/// Opening a missing file creates an empty database.
pub fn init(config: &StorageConfig) -> Result<String, StorageError> {
    let path = get_db_path(config);
    let db_path = path
        .to_str()
        .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?
        .to_string();

    fs::create_dir_all(&config.app_data_dir)?;

    let exists = path.exists();
    info!("Database path: {} (exists: {})", db_path, exists);
    if !exists {
        warn!("Database file does not exist. Creating new database...");
    }

    let mut conn = SqliteConnection::establish(&db_path)?;
    conn.batch_execute(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )?;

    Ok(db_path)
}

pub fn create_pool(db_path: &str, config: &StorageConfig) -> Result<Arc<DbPool>, StorageError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(config.max_pool_size)
        .min_idle(Some(1))
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
        }))
        .build(manager)?;
    Ok(Arc::new(pool))
}

/// Creates the activities table if it is missing. Idempotent.
pub fn create_schema(conn: &mut SqliteConnection) -> Result<(), StorageError> {
    conn.batch_execute(CREATE_ACTIVITIES_TABLE).map_err(|e| {
        error!("Error initializing database: {}", e);
        StorageError::from(e)
    })
}

/// Gets a connection from the pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, StorageError> {
    Ok(pool.get()?)
}

#[derive(Debug)]
struct ConnectionCustomizer {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}
