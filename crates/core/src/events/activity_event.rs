//! Activity list event types.

use serde::{Deserialize, Serialize};

/// Events emitted by the activity list controller.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    /// The list was replaced with a fresh read from the store.
    Loaded { count: usize },

    /// A new activity was stored and placed into the list.
    Added { id: i64 },

    /// An activity was removed from the list and from the store.
    Deleted { id: i64 },

    /// Every activity was removed.
    Cleared,

    /// The list already dropped `id` but the store kept it.
    /// The two stay out of step until the next reload.
    DeleteFailed { id: i64, message: String },

    /// A bulk delete failed; the list is unchanged.
    ClearFailed { message: String },

    /// A reload failed; the list still shows the previous read.
    RefreshFailed { message: String },
}

impl ActivityEvent {
    /// Failures are the events the UI should surface as a notification.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ActivityEvent::DeleteFailed { .. }
                | ActivityEvent::ClearFailed { .. }
                | ActivityEvent::RefreshFailed { .. }
        )
    }
}
