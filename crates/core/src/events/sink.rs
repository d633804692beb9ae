//! Activity event sink trait and implementations.

use std::sync::{Arc, Mutex, PoisonError};

use super::ActivityEvent;

/// Trait for receiving activity list events.
///
/// `emit()` must not block: it runs inline with the controller command that
/// produced the event.
pub trait ActivityEventSink: Send + Sync {
    fn emit(&self, event: ActivityEvent);
}

/// No-op implementation for contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpActivityEventSink;

impl ActivityEventSink for NoOpActivityEventSink {
    fn emit(&self, _event: ActivityEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockActivityEventSink {
    events: Arc<Mutex<Vec<ActivityEvent>>>,
}

impl MockActivityEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<ActivityEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ActivityEventSink for MockActivityEventSink {
    fn emit(&self, event: ActivityEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
