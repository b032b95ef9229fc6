//! Locations repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::location::Location,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Fetch a live location, `NotFound` otherwise
    async fn get_location_by_id(&self, location_id: &str) -> AppResult<Location>;
}

#[derive(Clone)]
pub struct LocationsRepository {
    pool: Pool<Postgres>,
}

impl LocationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationPort for LocationsRepository {
    async fn get_location_by_id(&self, location_id: &str) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            r#"
            SELECT location_id, name, location_type, parent_location_id, is_archived,
                   created_at, updated_at
            FROM locations
            WHERE location_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {} not found", location_id)))
    }
}
