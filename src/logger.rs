use anyhow::{Context, Result};
use chrono::{Local, Utc};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Oldest entries are dropped beyond this many
const MAX_ENTRIES: usize = 2000;

static FILE_LOG_PATH: OnceCell<PathBuf> = OnceCell::new();

/// Shared logger that can be used across the application
///
/// Entries are kept in memory for the logs dialog and forwarded to the `log`
/// facade, which writes them to a file once [`Logger::init_file_logging`] ran.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        log::info!(target: "loadwatch::app", "{}", message);

        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(formatted_message);
            if logs.len() > MAX_ENTRIES {
                let excess = logs.len() - MAX_ENTRIES;
                logs.drain(..excess);
            }
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            let mut sorted_logs = logs.clone();
            sorted_logs.reverse();
            sorted_logs
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// Path of the log file: `<data_dir>/loadwatch/loadwatch.log`
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("loadwatch").join("loadwatch.log"))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }

    /// Route the `log` facade to a file. Runs at most once per process; later
    /// calls return the path chosen by the first one.
    pub fn init_file_logging(enabled: bool) -> Result<Option<PathBuf>> {
        if !enabled {
            return Ok(FILE_LOG_PATH.get().cloned());
        }
        FILE_LOG_PATH
            .get_or_try_init(|| -> Result<PathBuf> {
                let path = Self::get_log_file_path()?;
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
                }
                fern::Dispatch::new()
                    .format(|out, message, record| {
                        out.finish(format_args!(
                            "[{} {} {}] {}",
                            Local::now().format("%Y-%m-%d %H:%M:%S"),
                            record.level(),
                            record.target(),
                            message
                        ))
                    })
                    .level(log::LevelFilter::Debug)
                    .level_for("hyper_util", log::LevelFilter::Warn)
                    .level_for("reqwest", log::LevelFilter::Info)
                    .chain(fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?)
                    .apply()
                    .context("A global logger is already installed")?;
                Ok(path)
            })
            .map(|path| Some(path.clone()))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
