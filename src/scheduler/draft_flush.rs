use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{engine::registry::DraftRegistry, error::AppError};

/// Starts the periodic draft flush scheduler
///
/// Every running draft is written to the database on a fixed cadence, so a crash
/// loses at most one interval of changes that the debounced writes had not yet
/// persisted.
///
/// # Arguments
/// - `registry`: Registry holding the running drafts
/// - `interval_minutes`: Minutes between flushes, clamped to 1..=59
pub async fn start_scheduler(
    registry: Arc<DraftRegistry>,
    interval_minutes: u32,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron_expression(interval_minutes).as_str(), move |_uuid, _lock| {
        let registry = registry.clone();

        Box::pin(async move {
            if registry.is_empty().await {
                return;
            }
            tracing::debug!("Flushing {} running draft(s)", registry.len().await);
            registry.flush_all().await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(
        "Draft flush scheduler started, running every {} minute(s)",
        interval_minutes.clamp(1, 59)
    );

    Ok(())
}

/// Cron expression (with seconds) firing every `interval_minutes` minutes.
fn cron_expression(interval_minutes: u32) -> String {
    format!("0 */{} * * * *", interval_minutes.clamp(1, 59))
}
