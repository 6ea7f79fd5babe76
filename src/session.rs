//! Session context holding the access/refresh token pair.
//!
//! One `Session` is created at startup and shared (cloned) between the API
//! client and the UI. Lifecycle: `acquire` at login, `update_access` after a
//! token refresh, `clear` at logout or when the session can no longer be
//! refreshed. When a store path is set, every change is mirrored to a JSON file
//! so a restart does not force a new login.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::models::TokenPair;

#[derive(Clone, Default)]
pub struct Session {
    tokens: Arc<RwLock<Option<TokenPair>>>,
    store: Option<Arc<PathBuf>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.store)
            .finish()
    }
}

impl Session {
    /// A session that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A session mirrored to `path`, restoring any tokens already stored there
    pub fn persistent(path: PathBuf) -> Self {
        let restored = match Self::read_store(&path) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {:#}", path.display(), e);
                None
            }
        };
        if restored.is_some() {
            debug!("Restored session from {}", path.display());
        }
        Self {
            tokens: Arc::new(RwLock::new(restored)),
            store: Some(Arc::new(path)),
        }
    }

    /// Default session file location: `<data_dir>/loadwatch/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("loadwatch").join("session.json"))
    }

    /// Store a freshly issued token pair (login)
    pub fn acquire(&self, tokens: TokenPair) {
        self.write(Some(tokens));
    }

    /// Replace the access token after a refresh; the refresh token is kept
    pub fn update_access(&self, access: String) {
        let current = self.snapshot();
        let refresh = current.and_then(|t| t.refresh);
        self.write(Some(TokenPair { access, refresh }));
    }

    /// Forget the tokens (logout or unrecoverable auth failure)
    pub fn clear(&self) {
        self.write(None);
    }

    pub fn access_token(&self) -> Option<String> {
        self.snapshot().map(|t| t.access).filter(|a| !a.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.snapshot().and_then(|t| t.refresh).filter(|r| !r.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn snapshot(&self) -> Option<TokenPair> {
        self.tokens
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn write(&self, tokens: Option<TokenPair>) {
        match self.tokens.write() {
            Ok(mut guard) => *guard = tokens.clone(),
            Err(poisoned) => *poisoned.into_inner() = tokens.clone(),
        }
        if let Some(path) = &self.store {
            if let Err(e) = Self::write_store(path, tokens.as_ref()) {
                warn!("Failed to persist session to {}: {:#}", path.display(), e);
            }
        }
    }

    fn read_store(path: &Path) -> Result<Option<TokenPair>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let tokens: TokenPair = serde_json::from_str(&content).context("Failed to parse session file")?;
        Ok(Some(tokens))
    }

    fn write_store(path: &Path, tokens: Option<&TokenPair>) -> Result<()> {
        match tokens {
            Some(tokens) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create session directory: {}", parent.display()))?;
                }
                let content = serde_json::to_string_pretty(tokens).context("Failed to serialize session")?;
                fs::write(path, content)
                    .with_context(|| format!("Failed to write session file: {}", path.display()))
            }
            None if path.exists() => {
                fs::remove_file(path).with_context(|| format!("Failed to remove session file: {}", path.display()))
            }
            None => Ok(()),
        }
    }
}
