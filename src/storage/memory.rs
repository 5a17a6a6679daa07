//! In-memory storage, for ephemeral deployments and tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CacheSnapshot;
use crate::storage::SnapshotStorage;

/// Keeps the last persisted snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<CacheSnapshot>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously persisted snapshot.
    pub fn with_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            writes: Mutex::new(0),
        }
    }

    /// The currently stored snapshot.
    pub fn stored(&self) -> Option<CacheSnapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `persist` calls so far.
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<CacheSnapshot>> {
        Ok(self.stored())
    }

    async fn persist(&self, snapshot: &CacheSnapshot) -> Result<()> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_writes() {
        let storage = MemoryStorage::new();
        assert!(storage.load().await.unwrap().is_none());

        storage.persist(&CacheSnapshot::default()).await.unwrap();
        storage.persist(&CacheSnapshot::default()).await.unwrap();

        assert_eq!(storage.writes(), 2);
        assert_eq!(storage.stored(), Some(CacheSnapshot::default()));
    }
}
