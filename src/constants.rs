//! Constants used throughout the application
//!
//! This module centralizes magic strings, UI text, default values for fields
//! the backend may omit, and other constant values.

// Canonical defaults for fields missing from backend payloads
pub const DEFAULT_MAX_ALLOWED_WEIGHT: f64 = 0.0;
pub const DEFAULT_VEHICLE_NAME: &str = "Unknown Vehicle";
pub const DEFAULT_PLATE: &str = "N/A";
pub const DEFAULT_VEHICLE_TYPE: &str = "Truck";
pub const DEFAULT_DRIVER: &str = "Unknown Driver";
pub const DEFAULT_OWNER: &str = "Unknown Owner";
pub const DEFAULT_LOCATION: &str = "Unknown Location";
pub const DEFAULT_PENALTY_RATE: f64 = 50000.0;
/// Map centre used when nothing on screen has coordinates (Dar es Salaam)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (-6.7924, 39.2083);

// Success Messages
pub const SUCCESS_LOGGED_IN: &str = "✅ Logged in";
pub const SUCCESS_LOGGED_OUT: &str = "✅ Logged out";
pub const SUCCESS_REGISTERED: &str = "✅ Registration successful, please log in";
pub const SUCCESS_VEHICLE_CREATED: &str = "✅ Vehicle created";
pub const SUCCESS_VEHICLE_UPDATED: &str = "✅ Vehicle updated";
pub const SUCCESS_VEHICLE_DELETED: &str = "✅ Vehicle deleted";
pub const SUCCESS_PENALTY_PAID: &str = "✅ Penalty marked as paid";
pub const SUCCESS_PENALTY_STATUS: &str = "✅ Penalty status updated";
pub const SUCCESS_RATE_UPDATED: &str = "✅ Penalty rate updated";
pub const SUCCESS_EXPORTED: &str = "✅ Exported";

// Info Messages
pub const INFO_PENALTY_ALREADY_PAID: &str = "This penalty is already paid";

// Error Messages
pub const ERROR_LOGIN_FAILED: &str = "❌ Login failed. Please try again.";
pub const ERROR_REGISTER_FAILED: &str = "❌ Registration failed";
pub const ERROR_SESSION_EXPIRED: &str = "❌ Session expired, please log in again";
pub const ERROR_LOAD_VEHICLES: &str = "❌ Failed to load vehicles";
pub const ERROR_LOAD_ALERTS: &str = "❌ Failed to load alerts";
pub const ERROR_LOAD_PENALTIES: &str = "❌ Failed to load penalties";
pub const ERROR_LOAD_REPORT: &str = "❌ Failed to load report data";
pub const ERROR_LOAD_DASHBOARD: &str = "❌ Failed to load dashboard";
pub const ERROR_LOAD_RATE: &str = "❌ Failed to load penalty rate";
pub const ERROR_VEHICLE_SAVE: &str = "❌ Failed to save vehicle";
pub const ERROR_VEHICLE_DELETE: &str = "❌ Failed to delete vehicle";
pub const ERROR_PENALTY_PAID: &str = "❌ Failed to mark penalty as paid";
pub const ERROR_PENALTY_STATUS: &str = "❌ Failed to update penalty status";
pub const ERROR_RATE_UPDATE: &str = "❌ Failed to update penalty rate";
pub const ERROR_EXPORT: &str = "❌ Export failed";
pub const ERROR_NOTHING_TO_EXPORT: &str = "❌ Nothing to export";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const DIALOG_TITLE_DEBUG_LOGS: &str = "🔍 Logs - Press 'Esc', 'G' or 'q' to close";
pub const LOADING_INDICATOR: &str = "⟳ Loading…";

// Export file names
pub const EXPORT_VEHICLES_CSV: &str = "vehicles.csv";
pub const EXPORT_VEHICLES_PDF: &str = "vehicle-report.pdf";
pub const EXPORT_ALERTS_CSV: &str = "vehicle-alerts.csv";
pub const EXPORT_PENALTIES_CSV: &str = "penalty-report.csv";

// UI Layout Constants
/// Minimum sidebar width in columns
pub const SIDEBAR_MIN_WIDTH: u16 = 16;
/// Maximum sidebar width in columns
pub const SIDEBAR_MAX_WIDTH: u16 = 40;
/// Default sidebar width in columns
pub const SIDEBAR_DEFAULT_WIDTH: u16 = 24;
/// Minimum main area width to preserve usability
pub const MAIN_AREA_MIN_WIDTH: u16 = 40;
