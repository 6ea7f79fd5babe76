//! Utility modules for the Loadwatch application.
//!
//! This module contains small helpers that are used throughout the
//! application and have no dependency on the API or the UI state.
//!
//! # Available Utilities
//!
//! - [`color`] - Terminal colors for severities and statuses
//! - [`datetime`] - Timestamp parsing, formatting and report date ranges
//! - [`format`] - Number, weight and currency formatting

pub mod color;
pub mod datetime;
pub mod format;
