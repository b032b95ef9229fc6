//! Schedulers repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::scheduler::{
        CreateSchedulerParamWithIdentity, CreateSchedulerParams, SchedulerRecord,
        UpdateSchedulerParams,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulerPort: Send + Sync {
    async fn create(&self, params: &CreateSchedulerParams) -> AppResult<()>;

    /// Update the end date of a live scheduler
    async fn update(&self, params: &UpdateSchedulerParams) -> AppResult<()>;

    async fn get_by_id(&self, scheduler_id: &str) -> AppResult<SchedulerRecord>;

    /// Insert all schedulers in one statement, returning identity -> scheduler ID
    async fn create_many(
        &self,
        params: &[CreateSchedulerParamWithIdentity],
    ) -> AppResult<HashMap<String, String>>;

    /// Insert or overwrite dates and frequency of a scheduler, reviving it
    /// if it was soft-deleted
    async fn upsert(&self, params: &CreateSchedulerParams) -> AppResult<()>;
}

#[derive(Clone)]
pub struct SchedulersRepository {
    pool: Pool<Postgres>,
}

impl SchedulersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchedulerPort for SchedulersRepository {
    async fn create(&self, params: &CreateSchedulerParams) -> AppResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO scheduler (scheduler_id, start_date, end_date, freq, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(&params.scheduler_id)
        .bind(params.start_date)
        .bind(params.end_date)
        .bind(params.frequency.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(AppError::RowsAffected {
                expected: 1,
                actual: result.rows_affected(),
            });
        }
        Ok(())
    }

    async fn update(&self, params: &UpdateSchedulerParams) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE scheduler
            SET end_date = $1, updated_at = $2
            WHERE scheduler_id = $3 AND deleted_at IS NULL
            "#,
        )
        .bind(params.end_date)
        .bind(Utc::now())
        .bind(&params.scheduler_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Scheduler {} not found",
                params.scheduler_id
            )));
        }
        Ok(())
    }

    async fn get_by_id(&self, scheduler_id: &str) -> AppResult<SchedulerRecord> {
        sqlx::query_as::<_, SchedulerRecord>(
            r#"
            SELECT scheduler_id, start_date, end_date, freq, created_at, updated_at, deleted_at
            FROM scheduler
            WHERE scheduler_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(scheduler_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Scheduler {} not found", scheduler_id)))
    }

    async fn create_many(
        &self,
        params: &[CreateSchedulerParamWithIdentity],
    ) -> AppResult<HashMap<String, String>> {
        if params.is_empty() {
            return Ok(HashMap::new());
        }

        let mut identities = Vec::with_capacity(params.len());
        let mut scheduler_ids = Vec::with_capacity(params.len());
        let mut start_dates: Vec<DateTime<Utc>> = Vec::with_capacity(params.len());
        let mut end_dates: Vec<DateTime<Utc>> = Vec::with_capacity(params.len());
        let mut frequencies = Vec::with_capacity(params.len());
        for p in params {
            identities.push(p.identity.clone());
            scheduler_ids.push(p.params.scheduler_id.clone());
            start_dates.push(p.params.start_date);
            end_dates.push(p.params.end_date);
            frequencies.push(p.params.frequency.as_str().to_string());
        }

        // Single round trip; the identity is joined back onto the inserted IDs.
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            WITH input AS (
                SELECT *
                FROM UNNEST($1::text[], $2::text[], $3::timestamptz[], $4::timestamptz[], $5::text[])
                    WITH ORDINALITY AS t(identity, scheduler_id, start_date, end_date, freq, ord)
            ),
            inserted AS (
                INSERT INTO scheduler (scheduler_id, start_date, end_date, freq, created_at, updated_at)
                SELECT scheduler_id, start_date, end_date, freq, $6, $6
                FROM input
                ORDER BY ord
                RETURNING scheduler_id
            )
            SELECT inserted.scheduler_id, input.identity
            FROM inserted
            JOIN input ON input.scheduler_id = inserted.scheduler_id
            ORDER BY input.ord
            "#,
        )
        .bind(&identities)
        .bind(&scheduler_ids)
        .bind(&start_dates)
        .bind(&end_dates)
        .bind(&frequencies)
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await?;

        if rows.len() != params.len() {
            return Err(AppError::RowsAffected {
                expected: params.len() as u64,
                actual: rows.len() as u64,
            });
        }

        Ok(rows
            .into_iter()
            .map(|(scheduler_id, identity)| (identity, scheduler_id))
            .collect())
    }

    async fn upsert(&self, params: &CreateSchedulerParams) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduler (scheduler_id, start_date, end_date, freq, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (scheduler_id) DO UPDATE
            SET start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                freq = EXCLUDED.freq,
                updated_at = EXCLUDED.updated_at,
                deleted_at = NULL
            "#,
        )
        .bind(&params.scheduler_id)
        .bind(params.start_date)
        .bind(params.end_date)
        .bind(params.frequency.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
