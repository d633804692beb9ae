//! Activities module - domain models, store contract and list controller.

mod activities_controller;
mod activities_model;
mod activities_traits;



pub use activities_controller::{ActivityListController, ControllerState};
pub use activities_model::{parse_steps, ActivityRecord, NewActivity};
pub use activities_traits::ActivityStoreTrait;
