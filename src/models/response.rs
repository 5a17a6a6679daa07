//! Structured results handed to the route layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{DayBlock, SubjectIdentity, SubjectKind};

/// Outcome of a schedule query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Schedule fetched and non-empty
    Success,
    /// Schedule fetched but has no days
    Empty,
    /// Id not present in the snapshot, nothing fetched
    NotFound,
    /// Fetch or extraction failed after retries
    Error,
}

/// The subject a response is about, serialized under `group` or `teacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectRef {
    Group(SubjectIdentity),
    Teacher(SubjectIdentity),
}

impl SubjectRef {
    pub fn new(kind: SubjectKind, identity: SubjectIdentity) -> Self {
        match kind {
            SubjectKind::Group => SubjectRef::Group(identity),
            SubjectKind::Teacher => SubjectRef::Teacher(identity),
        }
    }

    pub fn identity(&self) -> &SubjectIdentity {
        match self {
            SubjectRef::Group(identity) | SubjectRef::Teacher(identity) => identity,
        }
    }
}

/// Result of `group_schedule` / `teacher_schedule`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,

    #[serde(flatten)]
    pub subject: SubjectRef,

    pub schedule: Vec<DayBlock>,

    /// When this response was produced
    pub last_updated: DateTime<Utc>,

    pub status: ScheduleStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScheduleResponse {
    pub fn fetched(kind: SubjectKind, identity: SubjectIdentity, schedule: Vec<DayBlock>) -> Self {
        let status = if schedule.is_empty() {
            ScheduleStatus::Empty
        } else {
            ScheduleStatus::Success
        };
        Self {
            success: true,
            subject: SubjectRef::new(kind, identity),
            schedule,
            last_updated: Utc::now(),
            status,
            error: None,
        }
    }

    pub fn not_found(kind: SubjectKind, id: &str) -> Self {
        Self {
            success: false,
            subject: SubjectRef::new(kind, SubjectIdentity::unknown(kind, id)),
            schedule: Vec::new(),
            last_updated: Utc::now(),
            status: ScheduleStatus::NotFound,
            error: None,
        }
    }

    pub fn failed(kind: SubjectKind, identity: SubjectIdentity, error: impl ToString) -> Self {
        Self {
            success: false,
            subject: SubjectRef::new(kind, identity),
            schedule: Vec::new(),
            last_updated: Utc::now(),
            status: ScheduleStatus::Error,
            error: Some(error.to_string()),
        }
    }
}

/// Readiness summary for health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub cache_ready: bool,
    pub last_updated: Option<DateTime<Utc>>,
}
