//! Business logic services

pub mod date_infos;
pub mod schedulers;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub schedulers: schedulers::SchedulersService,
    pub date_infos: date_infos::DateInfosService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            schedulers: schedulers::SchedulersService::new(Arc::new(repository.schedulers.clone())),
            date_infos: date_infos::DateInfosService::new(
                Arc::new(repository.locations.clone()),
                Arc::new(repository.date_infos.clone()),
            ),
            repository,
        }
    }

    /// Whether the database answers
    pub async fn is_ready(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                false
            }
        }
    }
}
