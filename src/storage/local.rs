//! Local filesystem storage implementation.
//!
//! Writes are atomic: the snapshot goes to a temporary sibling file which
//! is then renamed over the target, so readers never see a half-written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::CacheSnapshot;
use crate::storage::SnapshotStorage;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    snapshot_key: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, snapshot_key: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            snapshot_key: snapshot_key.into(),
        }
    }

    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.path(&self.snapshot_key)
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &Path) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &Path, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &Path) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &Path) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn load(&self) -> Result<Option<CacheSnapshot>> {
        let snapshot = self.read_json::<CacheSnapshot>(&self.snapshot_key).await?;
        match &snapshot {
            Some(s) => log::info!(
                "Loaded snapshot from {} ({} groups, {} teachers)",
                self.snapshot_path().display(),
                s.groups.len(),
                s.teachers.len()
            ),
            None => log::warn!(
                "No snapshot found at {}",
                self.snapshot_path().display()
            ),
        }
        Ok(snapshot)
    }

    async fn persist(&self, snapshot: &CacheSnapshot) -> Result<()> {
        self.write_json(&self.snapshot_key, snapshot).await?;
        log::info!("Snapshot saved to {}", self.snapshot_path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdentityRecord;
    use chrono::Utc;
    use tempfile::TempDir;

    fn storage(tmp: &TempDir) -> LocalStorage {
        LocalStorage::new(tmp.path(), "cache.json")
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        storage.write_bytes(Path::new("test.txt"), b"hello").await.unwrap();
        let data = storage.read_bytes(Path::new("test.txt")).await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(storage(&tmp).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_in_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("data"), "cache.json");

        let snapshot = CacheSnapshot::new(
            vec![IdentityRecord::new("12", "ИС-21")],
            vec![IdentityRecord::new("7", "Иванов И.И.")],
            Utc::now(),
        );
        storage.persist(&snapshot).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(snapshot));
        assert!(!storage.snapshot_path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_persisted_field_names() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let snapshot = CacheSnapshot::new(
            vec![IdentityRecord::new("12", "ИС-21")],
            vec![IdentityRecord::new("7", "Иванов И.И.")],
            Utc::now(),
        );
        storage.persist(&snapshot).await.unwrap();

        let raw = std::fs::read_to_string(storage.snapshot_path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json["lastUpdated"].is_string());
        assert_eq!(json["groups"][0]["id"], "12");
        assert_eq!(json["teachers"][0]["name"], "Иванов И.И.");
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        std::fs::write(storage.snapshot_path(), "{ not json").unwrap();

        assert!(matches!(storage.load().await, Err(AppError::Json(_))));
    }
}
