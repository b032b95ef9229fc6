//! Lesson rows as seen by the scheduler maintenance jobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The part of a lesson that references a scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LessonRecord {
    pub lesson_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub scheduler_id: Option<String>,
}
