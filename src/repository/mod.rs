//! Repository layer for database operations

pub mod date_infos;
pub mod lessons;
pub mod locations;
pub mod schedulers;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub schedulers: schedulers::SchedulersRepository,
    pub date_infos: date_infos::DateInfosRepository,
    pub locations: locations::LocationsRepository,
    pub lessons: lessons::LessonsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            schedulers: schedulers::SchedulersRepository::new(pool.clone()),
            date_infos: date_infos::DateInfosRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            lessons: lessons::LessonsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database, used by the readiness probe
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
