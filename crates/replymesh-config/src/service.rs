//! Validate-then-save wrapper over a settings store.

use std::sync::Arc;

use tracing::info;

use replymesh_protocols::error::ConfigError;

use crate::schema::Preferences;
use crate::store::SettingsStore;
use crate::validator::validate;

/// High-level preferences access used by the worker and the CLI.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Load the stored preferences, falling back to defaults when nothing
    /// was ever saved.
    pub async fn load_or_default(&self) -> Result<Preferences, ConfigError> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// Validate and persist a full record. Invalid records never reach the
    /// store.
    pub async fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        validate(prefs)?;
        self.store.save(prefs).await?;
        info!(tone = %prefs.tone, daily_limit = prefs.daily_limit, "Preferences saved");
        Ok(())
    }

    /// Merge a raw JSON document over defaults, validate, persist, and
    /// return the resulting record.
    pub async fn save_value(&self, value: serde_json::Value) -> Result<Preferences, ConfigError> {
        let prefs = Preferences::from_value(value)?;
        self.save(&prefs).await?;
        Ok(prefs)
    }
}
