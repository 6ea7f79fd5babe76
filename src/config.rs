//! Configuration management for Loadwatch
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{CONFIG_GENERATED, SIDEBAR_DEFAULT_WIDTH, SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};
use crate::ui::core::View;
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "LOADWATCH_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub sync: SyncConfig,
    pub display: DisplayConfig,
    pub reports: ReportsConfig,
    pub export: ExportConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the monitoring API, including the `/api/` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Server page size used when fetching all vehicles
    pub fetch_page_size: usize,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// View opened after login
    /// Options: "dashboard", "vehicles", "alerts", "reports", "penalties"
    pub default_view: String,
    /// Rows per page in list views
    pub page_size: usize,
    /// Sidebar width in columns
    pub sidebar_width: u16,
}

/// Background refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Auto-refresh interval in seconds (0 = disabled, manual refresh only)
    pub auto_refresh_interval_seconds: u64,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Date format for timestamps
    pub date_format: String,
    /// Time format for timestamps
    pub time_format: String,
    /// Currency code shown next to penalty amounts
    pub currency: String,
}

/// Reports configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Length of the default report date range, ending today
    pub default_range_days: u32,
    /// Weight limit drawn across the weight trend chart (kg)
    pub weight_limit_line: f64,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to (default: current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keep the token pair on disk between runs
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to a file
    pub enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout_seconds: 10,
            fetch_page_size: 100,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: "dashboard".to_string(),
            page_size: 10,
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_refresh_interval_seconds: 60,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: datetime::API_DATE_FORMAT.to_string(),
            time_format: "%H:%M".to_string(),
            currency: "TZS".to_string(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            default_range_days: 30,
            weight_limit_line: 15000.0,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SyncConfig {
    /// Refresh interval, `None` when auto-refresh is disabled
    pub fn interval(&self) -> Option<Duration> {
        (self.auto_refresh_interval_seconds > 0).then(|| Duration::from_secs(self.auto_refresh_interval_seconds))
    }
}

impl Config {
    /// Load configuration from file or return defaults, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        let mut config = if let Some(path) = config_path {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL when an override is set and non-empty
    pub fn apply_api_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("loadwatch.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("loadwatch").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // API settings
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("api.base_url cannot be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("api.base_url must start with http:// or https://, got '{}'", base_url);
        }
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            anyhow::bail!(
                "timeout_seconds must be between 1 and 300, got {}",
                self.api.timeout_seconds
            );
        }
        if !(1..=500).contains(&self.api.fetch_page_size) {
            anyhow::bail!(
                "fetch_page_size must be between 1 and 500, got {}",
                self.api.fetch_page_size
            );
        }

        // UI settings
        if !(1..=500).contains(&self.ui.page_size) {
            anyhow::bail!("page_size must be between 1 and 500, got {}", self.ui.page_size);
        }
        if self.ui.sidebar_width < SIDEBAR_MIN_WIDTH || self.ui.sidebar_width > SIDEBAR_MAX_WIDTH {
            anyhow::bail!(
                "sidebar_width must be between {} and {} columns, got {}",
                SIDEBAR_MIN_WIDTH,
                SIDEBAR_MAX_WIDTH,
                self.ui.sidebar_width
            );
        }
        if View::parse(&self.ui.default_view).is_none() {
            anyhow::bail!(
                "Unknown default_view '{}'. Options: {}",
                self.ui.default_view,
                View::ALL.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
            );
        }

        // Refresh interval
        if self.sync.auto_refresh_interval_seconds > 86400 {
            anyhow::bail!("auto_refresh_interval_seconds cannot exceed 86400 (24 hours)");
        }

        // Date/time formats
        if let Err(e) = chrono::NaiveDate::parse_from_str("2025-01-01", &self.display.date_format) {
            anyhow::bail!("Invalid date_format '{}': {}", self.display.date_format, e);
        }

        if let Err(e) = chrono::NaiveTime::parse_from_str("12:00", &self.display.time_format) {
            anyhow::bail!("Invalid time_format '{}': {}", self.display.time_format, e);
        }

        // Reports
        if !self.reports.weight_limit_line.is_finite() || self.reports.weight_limit_line <= 0.0 {
            anyhow::bail!(
                "weight_limit_line must be a positive number, got {}",
                self.reports.weight_limit_line
            );
        }

        Ok(())
    }

    /// The view to open after login
    pub fn default_view(&self) -> View {
        View::parse(&self.ui.default_view).unwrap_or_default()
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# Loadwatch Configuration File\n# Generated on {}\n# The {} environment variable overrides api.base_url\n\n",
            chrono::Local::now().format(datetime::API_DATE_FORMAT),
            API_URL_ENV
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("loadwatch"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
