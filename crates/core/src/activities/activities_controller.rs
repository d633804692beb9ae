use log::{debug, error, info, warn};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::activities_model::{insertion_index, parse_steps, ActivityRecord, NewActivity};
use super::activities_traits::ActivityStoreTrait;
use crate::errors::{ControllerError, DatabaseError, Result};
use crate::events::{ActivityEvent, ActivityEventSink};

/// Lifecycle of an [`ActivityListController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Ready,
    /// Initialization failed. Terminal; build a new controller to retry.
    Failed(String),
}

/// Keeps the displayed activity list in step with the store.
///
/// The in-memory list is a disposable copy: it is replaced wholesale on every
/// reload and the store stays the source of truth. No lock is held across an
/// await, so readers see optimistic removals while the store call is in flight.
pub struct ActivityListController {
    store: Arc<dyn ActivityStoreTrait>,
    event_sink: Arc<dyn ActivityEventSink>,
    state: RwLock<ControllerState>,
    activities: RwLock<Vec<ActivityRecord>>,
}

impl ActivityListController {
    pub fn new(store: Arc<dyn ActivityStoreTrait>, event_sink: Arc<dyn ActivityEventSink>) -> Self {
        Self {
            store,
            event_sink,
            state: RwLock::new(ControllerState::Uninitialized),
            activities: RwLock::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.read_state().clone()
    }

    /// Snapshot of the list as currently displayed, newest first.
    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.read_list().clone()
    }

    pub fn len(&self) -> usize {
        self.read_list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_list().is_empty()
    }

    /// First activation: sets up the store and loads every record.
    ///
    /// Calling this on a ready controller behaves like a focus reload.
    pub async fn activate(&self) -> Result<()> {
        match self.state() {
            ControllerState::Uninitialized => self.load_initial().await,
            ControllerState::Ready => self.reload().await,
            ControllerState::Failed(message) => Err(ControllerError::Failed(message).into()),
        }
    }

    /// The view came back into focus: re-read everything from the store.
    ///
    /// The first focus doubles as activation. On a failed read the previous
    /// list stays on screen.
    pub async fn on_view_activated(&self) -> Result<()> {
        self.activate().await
    }

    async fn load_initial(&self) -> Result<()> {
        info!("Activating activity list");
        let loaded: Result<Vec<ActivityRecord>> = async {
            self.store.initialize().await?;
            self.store.query_all().await
        }
        .await;

        match loaded {
            Ok(records) => {
                let count = records.len();
                *self.write_list() = records;
                *self.write_state() = ControllerState::Ready;
                info!("Activity list ready with {} activities", count);
                self.event_sink.emit(ActivityEvent::Loaded { count });
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                error!("Activity list failed to initialize: {}", message);
                *self.write_state() = ControllerState::Failed(message.clone());
                Err(DatabaseError::StorageUnavailable(message).into())
            }
        }
    }

    async fn reload(&self) -> Result<()> {
        match self.store.query_all().await {
            Ok(records) => {
                let count = records.len();
                *self.write_list() = records;
                debug!("Activity list reloaded: {} activities", count);
                self.event_sink.emit(ActivityEvent::Loaded { count });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reload activities: {}", e);
                self.event_sink.emit(ActivityEvent::RefreshFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Stores a new activity and places it in the list at its date position.
    pub async fn request_add(&self, steps: i64, date: i64) -> Result<ActivityRecord> {
        self.ensure_ready()?;

        let id = self
            .store
            .insert(steps, date)
            .await
            .inspect_err(|e| warn!("Failed to add activity ({} steps): {}", steps, e))?;
        let record = NewActivity::new(steps, date).into_record(id);

        {
            // A reload that ran while the insert was in flight may already show it.
            let mut list = self.write_list();
            if list.iter().any(|existing| existing.id == id) {
                debug!("Activity {} already in list", id);
            } else {
                let index = insertion_index(&list, &record);
                list.insert(index, record.clone());
                debug!("Activity {} added to list", id);
            }
        }
        self.event_sink.emit(ActivityEvent::Added { id });
        Ok(record)
    }

    /// Validates raw form input and logs it with the current time.
    pub async fn submit_entry(&self, steps_input: &str) -> Result<ActivityRecord> {
        let steps = parse_steps(steps_input)?;
        let entry = NewActivity::now(steps);
        self.request_add(entry.steps, entry.date).await
    }

    /// Removes `id` from the list right away, then deletes it from the store.
    ///
    /// The removal is not rolled back if the store call fails; the list and the
    /// store disagree until the next reload.
    pub async fn request_delete(&self, id: i64) -> Result<()> {
        self.ensure_ready()?;

        let removed = {
            let mut list = self.write_list();
            let before = list.len();
            list.retain(|activity| activity.id != id);
            before != list.len()
        };
        if !removed {
            debug!("Activity {} was not in the list", id);
        }

        match self.store.delete_by_id(id).await {
            Ok(()) => {
                self.event_sink.emit(ActivityEvent::Deleted { id });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete activity {}: {}", id, e);
                self.event_sink.emit(ActivityEvent::DeleteFailed {
                    id,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Deletes every activity. The list is cleared only once the store confirms.
    pub async fn request_delete_all(&self) -> Result<()> {
        self.ensure_ready()?;

        match self.store.delete_all().await {
            Ok(()) => {
                self.write_list().clear();
                info!("All activities deleted");
                self.event_sink.emit(ActivityEvent::Cleared);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete all activities: {}", e);
                self.event_sink.emit(ActivityEvent::ClearFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        match &*self.read_state() {
            ControllerState::Ready => Ok(()),
            ControllerState::Uninitialized => Err(ControllerError::NotReady.into()),
            ControllerState::Failed(message) => Err(ControllerError::Failed(message.clone()).into()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ControllerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ControllerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_list(&self) -> RwLockReadGuard<'_, Vec<ActivityRecord>> {
        self.activities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_list(&self) -> RwLockWriteGuard<'_, Vec<ActivityRecord>> {
        self.activities.write().unwrap_or_else(PoisonError::into_inner)
    }
}
