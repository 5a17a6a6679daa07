//! Pipeline entry points for cache operations.
//!
//! - `run_refresh`: Fetch both lists once and persist the snapshot
//! - `run_schedule`: Initialize the cache and answer a single schedule query
//! - `run_info`: Summarize the persisted snapshot
//! - `run_validate`: Check configuration and selectors
//! - `run_server`: Serve the HTTP routes with a background refresh timer

pub mod info;
pub mod refresh;
pub mod retry;
pub mod schedule;
#[cfg(feature = "server")]
pub mod serve;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use crate::cache::ScheduleCache;
use crate::error::Result;
use crate::models::Config;
use crate::services::HttpFetcher;
use crate::storage::LocalStorage;

pub use info::{SnapshotInfo, run_info};
pub use refresh::run_refresh;
pub use retry::RetryPolicy;
pub use schedule::run_schedule;
#[cfg(feature = "server")]
pub use serve::run_server;
pub use validate::run_validate;

/// Snapshot storage under `storage_dir`, at the configured cache path.
pub fn snapshot_storage(config: &Config, storage_dir: &Path) -> LocalStorage {
    LocalStorage::new(storage_dir, &config.cache.path)
}

/// Build a cache backed by the live site and local snapshot storage.
pub fn build_cache(config: Arc<Config>, storage_dir: &Path) -> Result<Arc<ScheduleCache>> {
    let fetcher = HttpFetcher::new(&config.crawler)?;
    let storage = snapshot_storage(&config, storage_dir);
    let cache = ScheduleCache::new(config, Arc::new(fetcher), Arc::new(storage))?;
    Ok(Arc::new(cache))
}
