//! The schedule cache.
//!
//! Owns the identity snapshot (groups and teachers), keeps it fresh, and
//! answers schedule queries by fetching live pages for known ids.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──init()──▶ Initializing ──▶ Ready
//!                               │  ▲
//!                               └──┘ failed refresh, up to `init_attempts`
//! ```
//!
//! `Ready` does not imply fresh: when every initial refresh fails the cache
//! still becomes ready, serving whatever was persisted (possibly nothing).
//!
//! All snapshot mutation goes through [`ScheduleCache::refresh`], which is
//! exclusive with itself and swaps the snapshot `Arc` only after both lists
//! were fetched and validated. Readers always see a complete snapshot.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{OnceCell, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::{AppError, Result};
use crate::models::{
    CacheHealth, CacheSnapshot, Config, DayBlock, IdentityRecord, ScheduleResponse,
    SubjectIdentity, SubjectKind,
};
use crate::pipeline::RetryPolicy;
use crate::services::{Document, DocumentFetcher, ListExtractor, ScheduleExtractor};
use crate::storage::SnapshotStorage;
use crate::utils::{fs::dump_debug_page, schedule_url};


/// Where the cache is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Uninitialized,
    Initializing,
    Ready,
}

/// What a call to [`ScheduleCache::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced and persisted
    Updated { groups: usize, teachers: usize },
    /// Another refresh holds the lock; nothing was done
    AlreadyRunning,
    /// Shutdown was requested; the live snapshot was left untouched
    Cancelled,
}

/// Cache of groups and teachers with on-demand schedule lookups.
pub struct ScheduleCache {
    config: Arc<Config>,
    fetcher: Arc<dyn DocumentFetcher>,
    storage: Arc<dyn SnapshotStorage>,
    retry: RetryPolicy,
    lists: ListExtractor,
    group_schedule: ScheduleExtractor,
    teacher_schedule: ScheduleExtractor,
    snapshot: RwLock<Arc<CacheSnapshot>>,
    state: Mutex<CacheState>,
    init: OnceCell<()>,
    refresh_lock: tokio::sync::Mutex<()>,
    shutdown: watch::Sender<bool>,
}

impl ScheduleCache {
    /// Create an empty, uninitialized cache.
    pub fn new(
        config: Arc<Config>,
        fetcher: Arc<dyn DocumentFetcher>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Result<Self> {
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            retry: RetryPolicy::from_config(&config.retry),
            lists: ListExtractor::new(&config.selectors)?,
            group_schedule: ScheduleExtractor::new(SubjectKind::Group, &config.selectors)?,
            teacher_schedule: ScheduleExtractor::new(SubjectKind::Teacher, &config.selectors)?,
            config,
            fetcher,
            storage,
            snapshot: RwLock::new(Arc::new(CacheSnapshot::default())),
            state: Mutex::new(CacheState::Uninitialized),
            init: OnceCell::new(),
            refresh_lock: tokio::sync::Mutex::new(()),
            shutdown,
        })
    }

    // --- Lifecycle ---

    /// Load the persisted snapshot and refresh it if empty or stale.
    ///
    /// Concurrent callers share a single initialization; later calls return
    /// immediately.
    pub async fn init(&self) {
        self.init.get_or_init(|| self.initialize()).await;
    }

    async fn initialize(&self) {
        self.set_state(CacheState::Initializing);

        match self.storage.load().await {
            Ok(Some(snapshot)) => self.replace(snapshot.normalized()),
            Ok(None) => {}
            Err(e) => log::error!("Failed to load persisted snapshot, starting empty: {}", e),
        }

        if self.needs_refresh() {
            log::info!("Snapshot is empty or stale, refreshing");
            self.initial_refresh().await;
        } else {
            log::info!(
                "Using persisted snapshot from {:?}",
                self.snapshot().last_updated
            );
        }

        self.set_state(CacheState::Ready);
        log::info!("Schedule cache ready");
    }

    async fn initial_refresh(&self) {
        let attempts = self.config.cache.init_attempts.max(1);
        let mut attempt = 1;
        while attempt <= attempts {
            match self.refresh().await {
                Ok(RefreshOutcome::AlreadyRunning) => {
                    // Wait for the running refresh, then judge its result.
                    drop(self.refresh_lock.lock().await);
                    if !self.needs_refresh() {
                        return;
                    }
                    continue;
                }
                Ok(_) => return,
                Err(e) if !self.is_stale(Utc::now()) => {
                    log::error!("Snapshot refreshed but not persisted: {}", e);
                    return;
                }
                Err(e) => {
                    log::error!(
                        "Initial refresh attempt {}/{} failed: {}",
                        attempt,
                        attempts,
                        e
                    );
                    if self.is_shutting_down() {
                        return;
                    }
                    if attempt < attempts {
                        self.pause(self.config.cache.init_retry_delay()).await;
                    }
                    attempt += 1;
                }
            }
        }

        let snapshot = self.snapshot();
        log::error!(
            "Giving up on initial refresh; serving degraded snapshot ({} groups, {} teachers)",
            snapshot.groups.len(),
            snapshot.teachers.len()
        );
    }

    /// Fetch both lists and replace the snapshot wholesale.
    ///
    /// Returns [`RefreshOutcome::AlreadyRunning`] without doing anything when
    /// another refresh is in progress. On any failure the live snapshot is
    /// left untouched.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            log::info!("Refresh already in progress, skipping");
            return Ok(RefreshOutcome::AlreadyRunning);
        };

        if self.is_shutting_down() {
            return Ok(RefreshOutcome::Cancelled);
        }

        log::info!("Starting cache refresh...");
        let fetched = futures::future::try_join(
            self.fetch_list(SubjectKind::Group),
            self.fetch_list(SubjectKind::Teacher),
        )
        .await;

        let (groups, teachers) = match fetched {
            Ok(lists) => lists,
            Err(AppError::Shutdown) => return Ok(self.cancelled()),
            Err(e) => {
                log::error!("Cache refresh failed, keeping previous snapshot: {}", e);
                return Err(e);
            }
        };

        if self.is_shutting_down() {
            return Ok(self.cancelled());
        }

        let snapshot = CacheSnapshot::new(groups, teachers, Utc::now());
        let outcome = RefreshOutcome::Updated {
            groups: snapshot.groups.len(),
            teachers: snapshot.teachers.len(),
        };
        self.replace(snapshot.clone());
        if let Err(e) = self.storage.persist(&snapshot).await {
            log::error!("Failed to persist refreshed snapshot: {}", e);
            return Err(e);
        }

        log::info!(
            "Cache updated: {} groups, {} teachers",
            snapshot.groups.len(),
            snapshot.teachers.len()
        );
        Ok(outcome)
    }

    fn cancelled(&self) -> RefreshOutcome {
        log::warn!("Shutdown requested during refresh, discarding results");
        RefreshOutcome::Cancelled
    }

    async fn fetch_list(&self, kind: SubjectKind) -> Result<Vec<IdentityRecord>> {
        let url = self.config.source.list_url(kind);
        let label = format!("{kind} list");

        self.retry
            .run(&label, || async move {
                if self.is_shutting_down() {
                    return Err(AppError::Shutdown);
                }

                let page = self.fetcher.fetch(url).await?;
                let records = self.lists.extract_page(&page, kind);
                if records.is_empty() {
                    self.dump_page(kind, &page).await;
                    return Err(AppError::structure(format!(
                        "no {kind} entries found at {url}"
                    )));
                }

                log::info!("Found {} {} entries", records.len(), kind);
                Ok(records)
            })
            .await
    }

    async fn dump_page(&self, kind: SubjectKind, page: &Document) {
        let Some(dir) = &self.config.cache.debug_dir else {
            return;
        };
        match dump_debug_page(dir, kind.as_str(), &page.body).await {
            Ok(path) => log::warn!("Saved empty {} list page to {}", kind, path.display()),
            Err(e) => log::warn!("Failed to save {} list page: {}", kind, e),
        }
    }

    /// Spawn the periodic refresh task. It stops after [`Self::shutdown`].
    pub fn spawn_refresh_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let period = cache.config.cache.refresh_interval();
        let mut shutdown = cache.shutdown.subscribe();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match cache.refresh().await {
                            Ok(outcome) => log::debug!("Scheduled refresh: {:?}", outcome),
                            Err(e) => log::error!("Scheduled refresh failed: {}", e),
                        }
                    }
                    _ = wait_for_shutdown(&mut shutdown) => break,
                }
            }
            log::info!("Refresh loop stopped");
        })
    }

    /// Ask background work to stop.
    ///
    /// A refresh in flight finishes its current attempt, starts no new one,
    /// and skips persistence.
    pub fn shutdown(&self) {
        if !self.shutdown.send_replace(true) {
            log::info!("Schedule cache shutting down");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    async fn pause(&self, delay: Duration) {
        let mut shutdown = self.shutdown.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = wait_for_shutdown(&mut shutdown) => {}
        }
    }

    // --- Queries ---

    pub fn state(&self) -> CacheState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_ready(&self) -> bool {
        self.state() == CacheState::Ready
    }

    /// Consistent view of the current snapshot.
    pub fn current(&self) -> Result<Arc<CacheSnapshot>> {
        if !self.is_ready() {
            return Err(AppError::Uninitialized);
        }
        Ok(self.snapshot())
    }

    pub fn list_groups(&self) -> Result<Vec<IdentityRecord>> {
        Ok(self.current()?.groups.clone())
    }

    pub fn list_teachers(&self) -> Result<Vec<IdentityRecord>> {
        Ok(self.current()?.teachers.clone())
    }

    pub async fn group_schedule(&self, id: &str) -> Result<ScheduleResponse> {
        self.schedule(SubjectKind::Group, id).await
    }

    pub async fn teacher_schedule(&self, id: &str) -> Result<ScheduleResponse> {
        self.schedule(SubjectKind::Teacher, id).await
    }

    /// Look up `id` and fetch its live schedule.
    ///
    /// Only [`AppError::Uninitialized`] is returned as an error; unknown ids
    /// and failed fetches become `not_found` / `error` responses.
    pub async fn schedule(&self, kind: SubjectKind, id: &str) -> Result<ScheduleResponse> {
        let Some(record) = self.current()?.find(kind, id).cloned() else {
            log::warn!("{} {} not found in cache", kind, id);
            return Ok(ScheduleResponse::not_found(kind, id));
        };

        log::info!("Fetching schedule for {} {} ({})", kind, id, record.name);
        let identity = SubjectIdentity::known(&record);
        match self.fetch_schedule(kind, id).await {
            Ok(days) => Ok(ScheduleResponse::fetched(kind, identity, days)),
            Err(e) => {
                log::error!("Failed to get schedule for {} {}: {}", kind, id, e);
                Ok(ScheduleResponse::failed(kind, identity, e))
            }
        }
    }

    /// Fetch and extract a schedule page through the retry policy.
    pub async fn fetch_schedule(&self, kind: SubjectKind, id: &str) -> Result<Vec<DayBlock>> {
        let url = schedule_url(&self.config.source.base_url, kind, id)?;
        let url = url.as_str();
        let extractor = self.extractor(kind);
        let label = format!("{kind} {id} schedule");

        self.retry
            .run(&label, || async move {
                let page = self.fetcher.fetch(url).await?;
                Ok(extractor.extract_page(&page))
            })
            .await
    }

    pub fn health(&self) -> CacheHealth {
        CacheHealth {
            cache_ready: self.is_ready(),
            last_updated: self.snapshot().last_updated,
        }
    }

    /// Whether the snapshot is missing a list or is stale.
    fn needs_refresh(&self) -> bool {
        self.snapshot().is_empty() || self.is_stale(Utc::now())
    }

    /// Whether the snapshot is older than the refresh interval.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.snapshot()
            .is_stale(now, self.config.cache.stale_after())
    }

    // --- Internals ---

    fn extractor(&self, kind: SubjectKind) -> &ScheduleExtractor {
        match kind {
            SubjectKind::Group => &self.group_schedule,
            SubjectKind::Teacher => &self.teacher_schedule,
        }
    }

    fn snapshot(&self) -> Arc<CacheSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn replace(&self, snapshot: CacheSnapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }

    fn set_state(&self, state: CacheState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender also ends the wait.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
