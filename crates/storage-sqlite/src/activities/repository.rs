use async_trait::async_trait;
use chrono::DateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{debug, info};
use std::sync::Arc;
use steplog_core::activities::{ActivityRecord, ActivityStoreTrait, NewActivity};
use steplog_core::Result;

use super::model::{ActivityDB, NewActivityDB};
use crate::config::StorageConfig;
use crate::db::{self, get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::activities;

/// SQLite-backed activity store.
///
/// Reads go straight to the pool; writes are funneled through the writer
/// actor. Each instance owns its own pool and actor, so two stores pointed at
/// different files never share state.
pub struct SqliteActivityStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteActivityStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteActivityStore { pool, writer }
    }

    /// Opens (or creates) the database described by `config`.
    ///
    /// Spawns the writer actor, so it must run inside a Tokio runtime;
    /// outside one it fails as unavailable storage. The table itself is
    /// created by [`ActivityStoreTrait::initialize`].
    pub fn open(config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        let db_path = db::init(config).map_err(StorageError::into_unavailable)?;
        let pool = db::create_pool(&db_path, config).map_err(StorageError::into_unavailable)?;
        let writer = db::spawn_writer((*pool).clone()).map_err(StorageError::into_unavailable)?;
        Ok(Self::new(pool, writer))
    }

    pub fn query_all_impl(&self) -> Result<Vec<ActivityRecord>> {
        let mut conn = get_connection(&self.pool).map_err(StorageError::into_read)?;
        let rows = activities::table
            .select(ActivityDB::as_select())
            .order((activities::date.desc(), activities::id.desc()))
            .load::<ActivityDB>(&mut conn)
            .into_core()?;
        debug!("Activities fetched: {}", rows.len());
        Ok(rows.into_iter().map(ActivityRecord::from).collect())
    }
}

fn describe_date(date: i64) -> String {
    DateTime::from_timestamp(date, 0)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| date.to_string())
}

#[async_trait]
impl ActivityStoreTrait for SqliteActivityStore {
    async fn initialize(&self) -> Result<()> {
        self.writer
            .exec(|conn: &mut SqliteConnection| db::create_schema(conn))
            .await
            .map_err(StorageError::into_unavailable)?;
        info!("Database initialized successfully.");
        Ok(())
    }

    async fn insert(&self, steps: i64, date: i64) -> Result<i64> {
        let new_activity: NewActivityDB = NewActivity::new(steps, date).into();
        let id = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> std::result::Result<i64, StorageError> {
                Ok(diesel::insert_into(activities::table)
                    .values(&new_activity)
                    .returning(activities::id)
                    .get_result::<i64>(conn)?)
            })
            .await
            .map_err(StorageError::into_write)?;
        debug!(
            "Activity {} inserted: {} steps on {}",
            id,
            steps,
            describe_date(date)
        );
        Ok(id)
    }

    async fn query_all(&self) -> Result<Vec<ActivityRecord>> {
        self.query_all_impl()
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let removed = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> std::result::Result<usize, StorageError> {
                Ok(diesel::delete(activities::table.find(id)).execute(conn)?)
            })
            .await
            .map_err(StorageError::into_write)?;
        debug!("Activity with ID {} deleted ({} row(s))", id, removed);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let removed = self
            .writer
            .exec(|conn: &mut SqliteConnection| -> std::result::Result<usize, StorageError> {
                Ok(diesel::delete(activities::table).execute(conn)?)
            })
            .await
            .map_err(StorageError::into_write)?;
        debug!("All activities deleted ({} row(s))", removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::sql_types::BigInt;
    use steplog_core::errors::{DatabaseError, Error};
    use tempfile::tempdir;

    #[derive(QueryableByName)]
    struct Count {
        #[diesel(sql_type = BigInt)]
        count: i64,
    }

    /// Creates a store backed by its own temp database file.
    async fn create_test_store() -> (SqliteActivityStore, StorageConfig, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config = StorageConfig::new(temp_dir.path());
        let store = SqliteActivityStore::open(&config).expect("Failed to open store");
        store.initialize().await.expect("Failed to initialize store");
        (store, config, temp_dir)
    }

    fn count(store: &SqliteActivityStore, sql: &str) -> i64 {
        let mut conn = get_connection(&store.pool).unwrap();
        diesel::sql_query(sql)
            .get_result::<Count>(&mut conn)
            .unwrap()
            .count
    }

    #[tokio::test]
    async fn test_insert_then_query_round_trip() {
        let (store, _config, _temp_dir) = create_test_store().await;

        let id = store.insert(5000, 1_700_000_000).await.unwrap();
        let records = store.query_all().await.unwrap();

        assert_eq!(
            records,
            vec![ActivityRecord {
                id,
                steps: 5000,
                date: 1_700_000_000
            }]
        );
    }

    #[tokio::test]
    async fn test_query_empty_table_returns_empty() {
        let (store, _config, _temp_dir) = create_test_store().await;
        assert!(store.query_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_orders_by_date_descending() {
        let (store, _config, _temp_dir) = create_test_store().await;
        for date in [100, 300, 200] {
            store.insert(10, date).await.unwrap();
        }

        let dates: Vec<i64> = store
            .query_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn test_equal_dates_keep_a_stable_order() {
        let (store, _config, _temp_dir) = create_test_store().await;
        let older = store.insert(1, 500).await.unwrap();
        let newer = store.insert(2, 500).await.unwrap();
        store.insert(3, 400).await.unwrap();

        let first = store.query_all().await.unwrap();
        let second = store.query_all().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].id, newer);
        assert_eq!(first[1].id, older);
    }

    #[tokio::test]
    async fn test_each_insert_gets_a_new_id() {
        let (store, _config, _temp_dir) = create_test_store().await;
        let a = store.insert(10, 1).await.unwrap();
        let b = store.insert(10, 1).await.unwrap();
        let c = store.insert(10, 1).await.unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let (store, _config, _temp_dir) = create_test_store().await;
        let id = store.insert(10, 100).await.unwrap();
        assert_eq!(id, 1);

        store.delete_by_id(id).await.unwrap();
        assert!(store.query_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_id_changes_nothing() {
        let (store, _config, _temp_dir) = create_test_store().await;
        store.insert(10, 100).await.unwrap();
        store.insert(20, 200).await.unwrap();
        let before = store.query_all().await.unwrap();

        store.delete_by_id(9_999).await.unwrap();
        assert_eq!(store.query_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_all_on_empty_table() {
        let (store, _config, _temp_dir) = create_test_store().await;
        store.delete_all().await.unwrap();
        assert!(store.query_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete_all() {
        let (store, _config, _temp_dir) = create_test_store().await;
        let first = store.insert(10, 100).await.unwrap();
        let second = store.insert(20, 200).await.unwrap();

        store.delete_all().await.unwrap();
        assert!(store.query_all().await.unwrap().is_empty());

        let third = store.insert(30, 300).await.unwrap();
        assert!(third > first && third > second);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_deleting_the_latest() {
        let (store, _config, _temp_dir) = create_test_store().await;
        let first = store.insert(10, 100).await.unwrap();
        store.delete_by_id(first).await.unwrap();

        let second = store.insert(20, 200).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_initialize_twice_creates_one_table() {
        let (store, _config, _temp_dir) = create_test_store().await;
        store.initialize().await.unwrap();

        assert_eq!(
            count(
                &store,
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = 'activities'"
            ),
            1
        );
        // No indexes, no bookkeeping tables beyond SQLite's own.
        assert_eq!(
            count(
                &store,
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE name NOT LIKE 'sqlite_%'"
            ),
            1
        );

        let id = store.insert(5000, 1_700_000_000).await.unwrap();
        assert_eq!(store.query_all().await.unwrap()[0].id, id);
    }

    #[tokio::test]
    async fn test_extreme_values_round_trip() {
        let (store, _config, _temp_dir) = create_test_store().await;
        store.insert(i64::MAX, i64::MIN).await.unwrap();
        store.insert(1, i64::MAX).await.unwrap();

        let records = store.query_all().await.unwrap();
        assert_eq!(records[0].date, i64::MAX);
        assert_eq!(records[1].steps, i64::MAX);
        assert_eq!(records[1].date, i64::MIN);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let (store, config, _temp_dir) = create_test_store().await;
        let id = store.insert(4200, 1_700_000_000).await.unwrap();
        drop(store);

        let reopened = SqliteActivityStore::open(&config).unwrap();
        reopened.initialize().await.unwrap();
        let records = reopened.query_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].steps, 4200);
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let (a, _config_a, _dir_a) = create_test_store().await;
        let (b, _config_b, _dir_b) = create_test_store().await;

        a.insert(10, 100).await.unwrap();
        assert!(b.query_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_before_initialize_is_a_read_error() {
        let temp_dir = tempdir().unwrap();
        let store = SqliteActivityStore::open(&StorageConfig::new(temp_dir.path())).unwrap();

        let err = store.query_all().await.unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::StorageRead(_))));
    }

    #[tokio::test]
    async fn test_insert_before_initialize_is_a_write_error() {
        let temp_dir = tempdir().unwrap();
        let store = SqliteActivityStore::open(&StorageConfig::new(temp_dir.path())).unwrap();

        let err = store.insert(10, 100).await.unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::StorageWrite(_))));
    }

    #[tokio::test]
    async fn test_open_reports_unavailable_storage() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("occupied");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = SqliteActivityStore::open(&StorageConfig::new(&blocker))
            .err()
            .expect("open should fail");
        assert!(err.is_unavailable());
    }

    fn run_sql(store: &SqliteActivityStore, sql: &str) {
        use diesel::connection::SimpleConnection;
        let mut conn = get_connection(&store.pool).unwrap();
        conn.batch_execute(sql).unwrap();
    }

    #[test]
    fn test_open_outside_runtime_is_unavailable() {
        let temp_dir = tempdir().unwrap();

        let err = SqliteActivityStore::open(&StorageConfig::new(temp_dir.path()))
            .err()
            .expect("open should fail without a runtime");
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_initialize_reports_unavailable_when_schema_fails() {
        let temp_dir = tempdir().unwrap();
        let store = SqliteActivityStore::open(&StorageConfig::new(temp_dir.path())).unwrap();
        // An index already owns the table's name, so CREATE TABLE cannot succeed.
        run_sql(
            &store,
            "CREATE TABLE other (x INTEGER); CREATE INDEX activities ON other (x);",
        );

        let err = store.initialize().await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_rejected_deletes_are_write_errors() {
        let (store, _config, _temp_dir) = create_test_store().await;
        let id = store.insert(10, 100).await.unwrap();
        run_sql(
            &store,
            "CREATE TRIGGER reject_deletes BEFORE DELETE ON activities
             BEGIN SELECT RAISE(ABORT, 'deletes rejected'); END;",
        );

        let err = store.delete_by_id(id).await.unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::StorageWrite(_))));

        let err = store.delete_all().await.unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::StorageWrite(_))));

        // The failed transactions rolled back; the row is still there.
        assert_eq!(store.query_all().await.unwrap().len(), 1);
    }
}
