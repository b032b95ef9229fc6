//! Repair schedulers that are missing or carry no valid frequency

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{enums::SchedulerFrequency, lesson::LessonRecord, scheduler::CreateSchedulerParams},
    repository::{lessons::LessonPort, schedulers::SchedulerPort},
};

use super::JobParams;

/// Scheduler values re-derived from the lessons that reference it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerRepair {
    pub scheduler_id: String,
    pub frequency: SchedulerFrequency,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<&SchedulerRepair> for CreateSchedulerParams {
    fn from(repair: &SchedulerRepair) -> Self {
        CreateSchedulerParams {
            scheduler_id: repair.scheduler_id.clone(),
            start_date: repair.start_date,
            end_date: repair.end_date,
            frequency: repair.frequency,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairSummary {
    pub repaired: u64,
    pub failed: u64,
}

/// Group lessons by scheduler and derive the scheduler each group implies.
///
/// One lesson means `once`, more mean `weekly`. The span runs from the
/// earliest start to the latest end plus one day.
pub fn plan_repairs(lessons: &[LessonRecord]) -> Vec<SchedulerRepair> {
    let mut groups: BTreeMap<&str, Vec<&LessonRecord>> = BTreeMap::new();
    for lesson in lessons {
        if let Some(scheduler_id) = lesson.scheduler_id.as_deref().filter(|id| !id.is_empty()) {
            groups.entry(scheduler_id).or_default().push(lesson);
        }
    }

    groups
        .into_iter()
        .filter_map(|(scheduler_id, group)| {
            let start_date = group.iter().map(|l| l.start_time).min()?;
            let end_date = group.iter().map(|l| l.end_time).max()?;
            let frequency = if group.len() == 1 {
                SchedulerFrequency::Once
            } else {
                SchedulerFrequency::Weekly
            };
            Some(SchedulerRepair {
                scheduler_id: scheduler_id.to_string(),
                frequency,
                start_date,
                end_date: end_date + Duration::hours(24),
            })
        })
        .collect()
}

#[tracing::instrument(
    skip_all,
    fields(resource_path = %params.resource_path, user_id = %params.user_id)
)]
pub async fn update_invalid_schedulers(
    params: &JobParams,
    lessons: Arc<dyn LessonPort>,
    schedulers: Arc<dyn SchedulerPort>,
) -> AppResult<RepairSummary> {
    params.validate()?;

    let rows = lessons
        .get_lessons_with_invalid_scheduler(&params.resource_path)
        .await?;
    let repairs = plan_repairs(&rows);
    tracing::info!(
        "Found {} lessons referencing {} invalid schedulers",
        rows.len(),
        repairs.len()
    );

    let mut summary = RepairSummary::default();
    for repair in &repairs {
        match schedulers.upsert(&CreateSchedulerParams::from(repair)).await {
            Ok(()) => summary.repaired += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::error!(scheduler_id = %repair.scheduler_id, "Failed to repair scheduler: {}", e);
            }
        }
    }

    tracing::info!(
        "Update invalid schedulers done: {} repaired, {} failed",
        summary.repaired,
        summary.failed
    );
    Ok(summary)
}
