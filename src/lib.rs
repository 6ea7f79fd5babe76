//! Loadwatch - A terminal dashboard for vehicle weight monitoring
//!
//! This library talks to the weight-monitoring REST backend and renders
//! vehicles, overload alerts, reports and penalties in an interactive
//! terminal UI built with Ratatui.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`api`] - REST client, token refresh and response normalization
//! * [`service`] - Dashboard operations built on the API
//! * [`list`] - Paging, filtering and load state of the record lists
//! * [`export`] - CSV and PDF reports
//! * [`ui`] - Terminal user interface components
//! * [`config`] - Application configuration management

/// Per-vehicle penalty totals
pub mod aggregate;

/// REST client for the monitoring backend
pub mod api;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// CSV and PDF export of tabular records
pub mod export;

/// Paginated, filterable record lists
pub mod list;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Domain records: vehicles, alerts, penalties, reports and auth payloads
pub mod models;

/// Dashboard operations shared by the UI
pub mod service;

/// Access and refresh token storage
pub mod session;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for date/time handling and other helpers
pub mod utils;
