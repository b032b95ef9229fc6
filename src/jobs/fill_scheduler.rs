//! Back-fill a one-off scheduler on every lesson that has none

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        enums::SchedulerFrequency,
        lesson::LessonRecord,
        scheduler::{CreateSchedulerParamWithIdentity, Scheduler},
    },
    repository::{lessons::LessonPort, schedulers::SchedulerPort},
};

use super::JobParams;

/// Outcome of a fill run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FillSchedulerSummary {
    pub pages_processed: u64,
    pub pages_failed: u64,
    pub lessons_filled: u64,
}

impl FillSchedulerSummary {
    fn merge(&mut self, other: FillSchedulerSummary) {
        self.pages_processed += other.pages_processed;
        self.pages_failed += other.pages_failed;
        self.lessons_filled += other.lessons_filled;
    }
}

/// Page offsets are published into a bounded channel drained by a fixed pool
/// of workers. A failed page is logged and skipped.
#[tracing::instrument(
    skip_all,
    fields(resource_path = %params.resource_path, user_id = %params.user_id)
)]
pub async fn fill_scheduler_to_lessons(
    params: &JobParams,
    lessons: Arc<dyn LessonPort>,
    schedulers: Arc<dyn SchedulerPort>,
) -> AppResult<FillSchedulerSummary> {
    params.validate()?;

    let total = lessons.count_lessons(&params.resource_path).await?;
    tracing::info!("Scanning {} lessons in pages of {}", total, params.page_size);

    let (tx, rx) = mpsc::channel::<i64>(params.channel_capacity);
    let rx = Arc::new(Mutex::new(rx));

    let mut handles = Vec::with_capacity(params.workers);
    for worker in 0..params.workers {
        let rx = Arc::clone(&rx);
        let lessons = Arc::clone(&lessons);
        let schedulers = Arc::clone(&schedulers);
        let resource_path = params.resource_path.clone();
        let page_size = params.page_size;

        handles.push(tokio::spawn(async move {
            let mut summary = FillSchedulerSummary::default();
            loop {
                let offset = rx.lock().await.recv().await;
                let Some(offset) = offset else { break };

                match fill_page(lessons.as_ref(), schedulers.as_ref(), &resource_path, offset, page_size).await {
                    Ok(filled) => {
                        summary.pages_processed += 1;
                        summary.lessons_filled += filled;
                        tracing::debug!(worker, offset, filled, "Page filled");
                    }
                    Err(e) => {
                        summary.pages_failed += 1;
                        tracing::error!(worker, offset, "Failed to fill page: {}", e);
                    }
                }
            }
            summary
        }));
    }

    let mut offset = 0;
    while offset < total {
        // Blocks while every worker is busy and the buffer is full.
        if tx.send(offset).await.is_err() {
            tracing::error!("All workers stopped, aborting at offset {}", offset);
            break;
        }
        offset += params.page_size;
    }
    drop(tx);

    let mut summary = FillSchedulerSummary::default();
    for handle in handles {
        match handle.await {
            Ok(worker_summary) => summary.merge(worker_summary),
            Err(e) => tracing::error!("Worker panicked: {}", e),
        }
    }

    tracing::info!(
        "Fill scheduler done: {} pages, {} failed, {} lessons filled",
        summary.pages_processed,
        summary.pages_failed,
        summary.lessons_filled
    );
    Ok(summary)
}

/// Create a `once` scheduler per lesson of the page and attach it
async fn fill_page(
    lessons: &dyn LessonPort,
    schedulers: &dyn SchedulerPort,
    resource_path: &str,
    offset: i64,
    limit: i64,
) -> AppResult<u64> {
    let rows = lessons
        .get_lessons_without_scheduler(resource_path, offset, limit)
        .await?;
    if rows.is_empty() {
        return Ok(0);
    }

    let params = rows
        .iter()
        .map(once_scheduler_for)
        .collect::<AppResult<Vec<_>>>()?;

    let scheduler_ids = schedulers.create_many(&params).await?;
    lessons.update_lesson_scheduler_ids(&scheduler_ids).await
}

fn once_scheduler_for(lesson: &LessonRecord) -> AppResult<CreateSchedulerParamWithIdentity> {
    let scheduler = Scheduler::new(
        Some(lesson.start_time),
        Some(lesson.start_time),
        Some(SchedulerFrequency::Once),
    );
    Ok(CreateSchedulerParamWithIdentity {
        identity: lesson.lesson_id.clone(),
        params: scheduler.to_params()?,
    })
}
