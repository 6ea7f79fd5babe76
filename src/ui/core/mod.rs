//! Core UI functionality for Loadwatch.
//!
//! This module contains the building blocks the views are made of.
//!
//! # Module Components
//!
//! - [`actions`] - Views, dialogs and the [`Action`] messages components exchange
//! - [`component`] - Base component trait
//! - [`context`] - Services and settings shared by every component
//! - [`event_handler`] - Terminal input polling and refresh ticks
//! - [`task_manager`] - Background API calls reporting back as actions
//!
//! # Architecture
//!
//! 1. **Components** implement the [`Component`] trait and turn key presses into actions
//! 2. **Actions** are routed by the app component to the list controllers
//! 3. **Tasks** run every network call off the UI loop via the [`TaskManager`]
//!    and answer with a single action carrying the result

pub mod actions;
pub mod component;
pub mod context;
pub mod event_handler;
pub mod task_manager;

pub use actions::{Action, DialogType, View};
pub use component::Component;
pub use context::AppContext;
pub use event_handler::{EventHandler, EventType};
pub use task_manager::{TaskId, TaskManager};
