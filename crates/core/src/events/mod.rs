//! Activity list events.
//!
//! The controller reports what happened to the list through an
//! [`ActivityEventSink`]. UI adapters turn these into list animations or
//! dismissible notifications.

mod activity_event;
mod sink;

pub use activity_event::*;
pub use sink::*;
