//! Steplog Core - domain entities, store contract and the activity list controller.
//!
//! This crate is database-agnostic. It defines [`activities::ActivityStoreTrait`],
//! which the `storage-sqlite` crate implements, and the controller that keeps
//! the on-screen list in step with the store.

pub mod activities;
pub mod errors;
pub mod events;

pub use activities::{
    parse_steps, ActivityListController, ActivityRecord, ActivityStoreTrait, ControllerState,
    NewActivity,
};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
