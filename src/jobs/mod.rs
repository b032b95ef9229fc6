//! One-off maintenance jobs over lesson schedulers
//!
//! Jobs receive everything they need through [`JobParams`] and the ports, so
//! they can run from the CLI or from tests alike.

pub mod fill_scheduler;
pub mod update_invalid_schedulers;

use validator::Validate;

use crate::config::JobsConfig;

/// Inputs of a job run
#[derive(Debug, Clone, Validate)]
pub struct JobParams {
    /// Tenant the job works on
    #[validate(length(min = 1, message = "resource_path cannot be empty"))]
    pub resource_path: String,
    /// Operator running the job, for the logs
    pub user_id: String,
    /// Lessons per page
    #[validate(range(min = 1, max = 10000))]
    pub page_size: i64,
    /// Number of concurrent page workers
    #[validate(range(min = 1, max = 64))]
    pub workers: usize,
    /// Pages buffered between the publisher and the workers
    #[validate(range(min = 1))]
    pub channel_capacity: usize,
}

impl JobParams {
    pub fn new(resource_path: impl Into<String>, user_id: impl Into<String>, config: &JobsConfig) -> Self {
        Self {
            resource_path: resource_path.into(),
            user_id: user_id.into(),
            page_size: config.page_size,
            workers: config.workers,
            channel_capacity: config.channel_capacity,
        }
    }
}
