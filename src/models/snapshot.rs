//! The cached identity snapshot and its freshness rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{IdentityRecord, SubjectKind};

/// Groups and teachers as of the last successful refresh.
///
/// `last_updated` is set if and only if both lists are non-empty; use
/// [`CacheSnapshot::new`] or [`CacheSnapshot::normalized`] to keep it so.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    #[serde(default)]
    pub groups: Vec<IdentityRecord>,

    #[serde(default)]
    pub teachers: Vec<IdentityRecord>,

    /// ISO 8601 timestamp of the refresh that produced this snapshot
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    /// Build a snapshot stamped with `now` when both lists are populated.
    pub fn new(
        groups: Vec<IdentityRecord>,
        teachers: Vec<IdentityRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            groups,
            teachers,
            last_updated: None,
        }
        .stamped(now)
    }

    fn stamped(mut self, now: DateTime<Utc>) -> Self {
        self.last_updated = (!self.is_empty()).then_some(now);
        self
    }

    /// Clear a timestamp that a partially populated snapshot should not carry.
    pub fn normalized(mut self) -> Self {
        if self.is_empty() {
            self.last_updated = None;
        }
        self
    }

    /// True when either list is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() || self.teachers.is_empty()
    }

    /// Stale when never stamped, or strictly older than `interval`.
    pub fn is_stale(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        is_stale(self.last_updated, now, interval)
    }

    pub fn records(&self, kind: SubjectKind) -> &[IdentityRecord] {
        match kind {
            SubjectKind::Group => &self.groups,
            SubjectKind::Teacher => &self.teachers,
        }
    }

    /// Exact-match lookup by upstream id.
    pub fn find(&self, kind: SubjectKind, id: &str) -> Option<&IdentityRecord> {
        self.records(kind).iter().find(|record| record.id == id)
    }
}

/// `last_updated` absent ⇒ stale; otherwise `now - last_updated > interval`.
pub fn is_stale(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>, interval: Duration) -> bool {
    match last_updated {
        None => true,
        Some(at) => now - at > interval,
    }
}
