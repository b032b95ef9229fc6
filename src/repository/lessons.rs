//! Lessons repository (scheduler references only)

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::lesson::LessonRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonPort: Send + Sync {
    /// Number of live lessons of a tenant
    async fn count_lessons(&self, resource_path: &str) -> AppResult<i64>;

    /// Lessons without scheduler within one page of all live lessons.
    ///
    /// Pages are taken over every live lesson ordered by ID, so offsets stay
    /// valid while other pages are being filled.
    async fn get_lessons_without_scheduler(
        &self,
        resource_path: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<LessonRecord>>;

    /// Set `scheduler_id` from a lesson ID -> scheduler ID map
    async fn update_lesson_scheduler_ids(&self, scheduler_ids: &HashMap<String, String>) -> AppResult<u64>;

    /// Lessons whose scheduler is missing or has no valid frequency
    async fn get_lessons_with_invalid_scheduler(&self, resource_path: &str) -> AppResult<Vec<LessonRecord>>;
}

#[derive(Clone)]
pub struct LessonsRepository {
    pool: Pool<Postgres>,
}

impl LessonsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonPort for LessonsRepository {
    async fn count_lessons(&self, resource_path: &str) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons WHERE resource_path = $1 AND deleted_at IS NULL",
        )
        .bind(resource_path)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn get_lessons_without_scheduler(
        &self,
        resource_path: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<LessonRecord>> {
        let rows = sqlx::query_as::<_, LessonRecord>(
            r#"
            WITH page AS (
                SELECT lesson_id, start_time, end_time, scheduler_id
                FROM lessons
                WHERE resource_path = $1 AND deleted_at IS NULL
                ORDER BY lesson_id
                OFFSET $2 LIMIT $3
            )
            SELECT lesson_id, start_time, end_time, scheduler_id
            FROM page
            WHERE scheduler_id IS NULL OR scheduler_id = ''
            ORDER BY lesson_id
            "#,
        )
        .bind(resource_path)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_lesson_scheduler_ids(&self, scheduler_ids: &HashMap<String, String>) -> AppResult<u64> {
        if scheduler_ids.is_empty() {
            return Ok(0);
        }
        let (lesson_ids, ids): (Vec<String>, Vec<String>) = scheduler_ids
            .iter()
            .map(|(lesson_id, scheduler_id)| (lesson_id.clone(), scheduler_id.clone()))
            .unzip();

        let result = sqlx::query(
            r#"
            UPDATE lessons AS l
            SET scheduler_id = t.scheduler_id, updated_at = $3
            FROM UNNEST($1::text[], $2::text[]) AS t(lesson_id, scheduler_id)
            WHERE l.lesson_id = t.lesson_id
            "#,
        )
        .bind(&lesson_ids)
        .bind(&ids)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn get_lessons_with_invalid_scheduler(&self, resource_path: &str) -> AppResult<Vec<LessonRecord>> {
        let rows = sqlx::query_as::<_, LessonRecord>(
            r#"
            SELECT l.lesson_id, l.start_time, l.end_time, l.scheduler_id
            FROM lessons l
            LEFT JOIN scheduler s
                ON s.scheduler_id = l.scheduler_id AND s.deleted_at IS NULL
            WHERE l.resource_path = $1
              AND l.deleted_at IS NULL
              AND l.scheduler_id IS NOT NULL AND l.scheduler_id <> ''
              AND (s.scheduler_id IS NULL OR s.freq IS NULL OR s.freq NOT IN ('once', 'weekly'))
            ORDER BY l.scheduler_id, l.start_time
            "#,
        )
        .bind(resource_path)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
