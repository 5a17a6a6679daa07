//! Persisted snapshot summary.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::storage::SnapshotStorage;

/// What `info` reports about the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub groups: usize,
    pub teachers: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub stale: bool,
}

/// Load the persisted snapshot and report its size and freshness.
///
/// Returns `None` when nothing has been persisted yet.
pub async fn run_info(config: &Config, storage: &dyn SnapshotStorage) -> Result<Option<SnapshotInfo>> {
    let Some(snapshot) = storage.load().await? else {
        log::info!("No snapshot found yet.");
        return Ok(None);
    };

    let snapshot = snapshot.normalized();
    let info = SnapshotInfo {
        groups: snapshot.groups.len(),
        teachers: snapshot.teachers.len(),
        last_updated: snapshot.last_updated,
        stale: snapshot.is_stale(Utc::now(), config.cache.stale_after()),
    };

    log::info!("Groups: {}", info.groups);
    log::info!("Teachers: {}", info.teachers);
    match info.last_updated {
        Some(at) => log::info!("Last updated: {}", at.to_rfc3339()),
        None => log::info!("Last updated: never"),
    }
    log::info!("Stale: {}", if info.stale { "yes" } else { "no" });

    Ok(Some(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CacheSnapshot, IdentityRecord};
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn reports_missing_snapshot() {
        let info = run_info(&Config::default(), &MemoryStorage::new()).await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn reports_fresh_snapshot() {
        let now = Utc::now();
        let storage = MemoryStorage::with_snapshot(CacheSnapshot::new(
            vec![IdentityRecord::new("1", "ИС-21"), IdentityRecord::new("2", "ИС-22")],
            vec![IdentityRecord::new("7", "Иванов И.И.")],
            now,
        ));

        let info = run_info(&Config::default(), &storage).await.unwrap().unwrap();

        assert_eq!(
            info,
            SnapshotInfo {
                groups: 2,
                teachers: 1,
                last_updated: Some(now),
                stale: false,
            }
        );
    }

    #[tokio::test]
    async fn half_empty_snapshot_is_stale() {
        let storage = MemoryStorage::with_snapshot(CacheSnapshot {
            groups: vec![IdentityRecord::new("12", "ИС-21")],
            teachers: vec![],
            last_updated: Some(Utc::now()),
        });

        let info = run_info(&Config::default(), &storage).await.unwrap().unwrap();

        assert!(info.last_updated.is_none());
        assert!(info.stale);
    }
}
