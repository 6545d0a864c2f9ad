//! Preferences persistence.
//!
//! The store holds exactly one document. Writes replace the whole document
//! through a temp-file rename so a crash mid-write never leaves a torn
//! record behind.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use replymesh_protocols::error::ConfigError;

use crate::schema::Preferences;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Synced-scope settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the stored preferences, if any were ever saved.
    async fn load(&self) -> Result<Option<Preferences>, ConfigError>;

    /// Replace the stored preferences.
    async fn save(&self, prefs: &Preferences) -> Result<(), ConfigError>;
}

/// In-memory settings store for testing.
#[derive(Default)]
pub struct MemorySettingsStore {
    prefs: RwLock<Option<Preferences>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with a record.
    pub fn with(prefs: Preferences) -> Self {
        Self {
            prefs: RwLock::new(Some(prefs)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Option<Preferences>, ConfigError> {
        Ok(self.prefs.read().await.clone())
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        *self.prefs.write().await = Some(prefs.clone());
        Ok(())
    }
}

/// File-backed settings store: one JSON document on disk.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user default location: `<config_dir>/replymesh/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("replymesh").join("settings.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Option<Preferences>, ConfigError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::Persistence(e.to_string())),
        };

        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Preferences::from_value(value).map(Some)
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::Persistence(e.to_string()))?;
        }

        let text = serde_json::to_string_pretty(prefs)
            .map_err(|e| ConfigError::Persistence(e.to_string()))?;

        // Whole-document replace: write aside, then rename into place.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text.as_bytes())
            .await
            .map_err(|e| ConfigError::Persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ConfigError::Persistence(e.to_string()))?;

        debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}
