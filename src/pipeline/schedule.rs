//! Single schedule lookup.

use crate::cache::ScheduleCache;
use crate::error::Result;
use crate::models::{ScheduleResponse, SubjectKind};

/// Initialize the cache, then fetch the schedule for one group or teacher.
pub async fn run_schedule(
    cache: &ScheduleCache,
    kind: SubjectKind,
    id: &str,
) -> Result<ScheduleResponse> {
    cache.init().await;

    let response = cache.schedule(kind, id).await?;
    log::info!(
        "{} {}: {} days ({:?})",
        kind,
        id,
        response.schedule.len(),
        response.status
    );
    Ok(response)
}
