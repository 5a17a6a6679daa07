//! One-shot snapshot refresh.

use chrono::Utc;

use crate::cache::{RefreshOutcome, ScheduleCache};
use crate::error::Result;

/// Fetch both lists once and persist the resulting snapshot.
pub async fn run_refresh(cache: &ScheduleCache) -> Result<RefreshOutcome> {
    let start_time = Utc::now();
    log::info!("Refreshing group and teacher lists...");

    let outcome = cache.refresh().await?;
    match outcome {
        RefreshOutcome::Updated { groups, teachers } => log::info!(
            "Refresh complete in {}s: {} groups, {} teachers",
            (Utc::now() - start_time).num_seconds(),
            groups,
            teachers
        ),
        RefreshOutcome::AlreadyRunning => log::warn!("Another refresh is already running"),
        RefreshOutcome::Cancelled => log::warn!("Refresh cancelled"),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::Config;
    use crate::services::fake::FakeFetcher;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn refresh_persists_snapshot() {
        let config = Config::default();
        let fetcher = FakeFetcher::new()
            .page(
                &config.source.groups_list_url,
                r#"<div name="gr" data="1">ИС-21</div>"#,
            )
            .page(
                &config.source.teachers_list_url,
                r#"<div name="prep" data="2">Иванов И.И.</div>"#,
            );
        let storage = Arc::new(MemoryStorage::new());
        let cache =
            ScheduleCache::new(Arc::new(config), Arc::new(fetcher), storage.clone()).unwrap();

        let outcome = run_refresh(&cache).await.unwrap();

        assert_eq!(
            outcome,
            RefreshOutcome::Updated {
                groups: 1,
                teachers: 1
            }
        );
        let stored = storage.stored().unwrap();
        assert_eq!(stored.groups[0].name, "ИС-21");
        assert!(stored.last_updated.is_some());
    }
}
