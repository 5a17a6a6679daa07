// src/models/mod.rs

//! Domain models for the schedule crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod identity;
mod response;
mod schedule;
mod selectors;
mod snapshot;

// Re-export all public types
pub use config::{
    CacheConfig, Config, CrawlerConfig, LoggingConfig, MAX_REFRESH_INTERVAL_MINS, RetryConfig,
    ServerConfig, SourceConfig,
};
pub use identity::{IdentityRecord, SubjectIdentity, SubjectKind};
pub use response::{CacheHealth, ScheduleResponse, ScheduleStatus, SubjectRef};
pub use schedule::{DayBlock, GroupLesson, Lesson, TeacherLesson, Weekday, date_format};
pub use selectors::PageSelectors;
pub use snapshot::{CacheSnapshot, is_stale};
