//! Usage record persistence.
//!
//! Local-scope store holding exactly one record. File writes go through a
//! temp-file rename so the record is never left partially written.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use replymesh_protocols::error::LedgerError;

use crate::record::UsageRecord;

/// Local-scope ledger store.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the stored record, if one exists.
    async fn load(&self) -> Result<Option<UsageRecord>, LedgerError>;

    /// Replace the stored record.
    async fn save(&self, record: &UsageRecord) -> Result<(), LedgerError>;
}

/// In-memory ledger store for testing.
#[derive(Default)]
pub struct MemoryLedgerStore {
    record: RwLock<Option<UsageRecord>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with a record.
    pub fn with(record: UsageRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn load(&self) -> Result<Option<UsageRecord>, LedgerError> {
        Ok(*self.record.read().await)
    }

    async fn save(&self, record: &UsageRecord) -> Result<(), LedgerError> {
        *self.record.write().await = Some(*record);
        Ok(())
    }
}

/// File-backed ledger store: one JSON document on disk.
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    /// Create a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user default location: `<data_dir>/replymesh/usage.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("replymesh").join("usage.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn load(&self) -> Result<Option<UsageRecord>, LedgerError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LedgerError::Persistence(e.to_string())),
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| LedgerError::Persistence(e.to_string()))
    }

    async fn save(&self, record: &UsageRecord) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerError::Persistence(e.to_string()))?;
        }

        let text = serde_json::to_string(record)
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text.as_bytes())
            .await
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;

        debug!("Saved usage record to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryLedgerStore::new();
        assert!(store.load().await.unwrap().is_none());

        let record = UsageRecord::fresh(50, Utc::now());
        store.save(&record).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileLedgerStore::new(dir.path().join("usage.json"));
        assert!(store.load().await.unwrap().is_none());

        let record = UsageRecord {
            count: 7,
            ..UsageRecord::fresh(50, Utc::now())
        };
        store.save(&record).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn file_store_corrupt_record_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");
        tokio::fs::write(&path, "{oops").await.unwrap();

        let store = FileLedgerStore::new(path);
        assert!(store.load().await.is_err());
    }
}
