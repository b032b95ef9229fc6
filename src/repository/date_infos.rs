//! Day info repository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::date_info::{DateInfoDetailed, DateInfoRecord, UpsertDateInfoParams},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DateInfoPort: Send + Sync {
    /// Upsert on `(date, location_id)`, returning the affected row count
    async fn upsert_date_info(&self, params: &UpsertDateInfoParams) -> AppResult<u64>;

    /// Upsert every row in one statement, returning the affected row count
    async fn duplicate_date_info(&self, params: &[UpsertDateInfoParams]) -> AppResult<u64>;

    async fn get_date_info_by_date_and_location_id(
        &self,
        date: NaiveDate,
        location_id: &str,
    ) -> AppResult<DateInfoRecord>;

    async fn get_date_info_detailed_by_date_range_and_location_id(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        location_id: &str,
    ) -> AppResult<Vec<DateInfoDetailed>>;

    async fn get_all_to_export(&self) -> AppResult<Vec<DateInfoRecord>>;
}

#[derive(Clone)]
pub struct DateInfosRepository {
    pool: Pool<Postgres>,
}

impl DateInfosRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const DATE_INFO_COLUMNS: &str =
    "date, location_id, day_type_id, opening_time, status, time_zone, created_at, updated_at, deleted_at";

#[async_trait]
impl DateInfoPort for DateInfosRepository {
    async fn upsert_date_info(&self, params: &UpsertDateInfoParams) -> AppResult<u64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO day_info (date, location_id, day_type_id, opening_time, status,
                                  time_zone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (date, location_id) DO UPDATE
            SET date = EXCLUDED.date,
                location_id = EXCLUDED.location_id,
                day_type_id = EXCLUDED.day_type_id,
                opening_time = EXCLUDED.opening_time,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at,
                time_zone = EXCLUDED.time_zone
            "#,
        )
        .bind(params.date)
        .bind(&params.location_id)
        .bind(&params.date_type_id)
        .bind(&params.opening_time)
        .bind(&params.status)
        .bind(&params.time_zone)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn duplicate_date_info(&self, params: &[UpsertDateInfoParams]) -> AppResult<u64> {
        if params.is_empty() {
            return Ok(0);
        }

        let mut dates = Vec::with_capacity(params.len());
        let mut location_ids = Vec::with_capacity(params.len());
        let mut date_type_ids = Vec::with_capacity(params.len());
        let mut opening_times = Vec::with_capacity(params.len());
        let mut statuses = Vec::with_capacity(params.len());
        let mut time_zones = Vec::with_capacity(params.len());
        for p in params {
            dates.push(p.date);
            location_ids.push(p.location_id.clone());
            date_type_ids.push(p.date_type_id.clone());
            opening_times.push(p.opening_time.clone());
            statuses.push(p.status.clone());
            time_zones.push(p.time_zone.clone());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO day_info (date, location_id, day_type_id, opening_time, status,
                                  time_zone, created_at, updated_at)
            SELECT t.date, t.location_id, t.day_type_id, t.opening_time, t.status,
                   t.time_zone, $7, $7
            FROM UNNEST($1::date[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[])
                AS t(date, location_id, day_type_id, opening_time, status, time_zone)
            ON CONFLICT (date, location_id) DO UPDATE
            SET date = EXCLUDED.date,
                location_id = EXCLUDED.location_id,
                day_type_id = EXCLUDED.day_type_id,
                opening_time = EXCLUDED.opening_time,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at,
                time_zone = EXCLUDED.time_zone
            "#,
        )
        .bind(&dates)
        .bind(&location_ids)
        .bind(&date_type_ids)
        .bind(&opening_times)
        .bind(&statuses)
        .bind(&time_zones)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn get_date_info_by_date_and_location_id(
        &self,
        date: NaiveDate,
        location_id: &str,
    ) -> AppResult<DateInfoRecord> {
        let query = format!(
            "SELECT {} FROM day_info WHERE date = $1 AND location_id = $2 AND deleted_at IS NULL",
            DATE_INFO_COLUMNS
        );
        sqlx::query_as::<_, DateInfoRecord>(&query)
            .bind(date)
            .bind(location_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Day info for {} at location {} not found",
                    date, location_id
                ))
            })
    }

    async fn get_date_info_detailed_by_date_range_and_location_id(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        location_id: &str,
    ) -> AppResult<Vec<DateInfoDetailed>> {
        let rows = sqlx::query_as::<_, DateInfoDetailed>(
            r#"
            SELECT di.date, di.location_id, di.day_type_id, di.opening_time, di.status,
                   di.time_zone, di.created_at, di.updated_at, di.deleted_at,
                   dt.display_name AS day_type_display_name
            FROM day_info di
            LEFT JOIN day_type dt
                ON dt.day_type_id = di.day_type_id AND dt.deleted_at IS NULL
            WHERE di.location_id = $1
              AND di.date BETWEEN $2 AND $3
              AND di.deleted_at IS NULL
            ORDER BY di.date
            "#,
        )
        .bind(location_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_all_to_export(&self) -> AppResult<Vec<DateInfoRecord>> {
        let query = format!(
            "SELECT {} FROM day_info WHERE deleted_at IS NULL ORDER BY date, location_id",
            DATE_INFO_COLUMNS
        );
        let rows = sqlx::query_as::<_, DateInfoRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
