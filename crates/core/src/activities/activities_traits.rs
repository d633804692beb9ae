use super::activities_model::ActivityRecord;
use crate::Result;
use async_trait::async_trait;

/// Trait defining the contract for the activity store.
///
/// Implementations own the persistent copy of every record. Reads always come
/// back ordered by `date` descending.
#[async_trait]
pub trait ActivityStoreTrait: Send + Sync {
    /// Creates the backing table if it is missing. Safe to call on every start.
    async fn initialize(&self) -> Result<()>;
    /// Appends a record and returns the id the store assigned to it.
    async fn insert(&self, steps: i64, date: i64) -> Result<i64>;
    async fn query_all(&self) -> Result<Vec<ActivityRecord>>;
    /// Removing an id that does not exist is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<()>;
    async fn delete_all(&self) -> Result<()>;
}
