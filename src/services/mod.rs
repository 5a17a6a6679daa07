//! Service layer for the schedule crawler.
//!
//! This module contains:
//! - Page fetching (`DocumentFetcher`, `HttpFetcher`)
//! - Group/teacher list extraction (`ListExtractor`)
//! - Schedule page extraction (`ScheduleExtractor`)

mod fetcher;
mod lists;
mod schedule;

#[cfg(test)]
pub(crate) use fetcher::fake;
pub use fetcher::{Document, DocumentFetcher, HttpFetcher};
pub use lists::ListExtractor;
pub use schedule::ScheduleExtractor;
