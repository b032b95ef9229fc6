//! Scheduler commands and queries

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult, DomainError, ItemError},
    models::scheduler::{
        CreateManySchedulersRequest, CreateManySchedulersResponse,
        CreateSchedulerParamWithIdentity, CreateSchedulerRequest, CreateSchedulerResponse,
        CreateSchedulerWithIdentityRequest, Scheduler, SchedulerRecord, UpdateSchedulerRequest,
    },
    repository::schedulers::SchedulerPort,
};

#[derive(Clone)]
pub struct SchedulersService {
    schedulers: Arc<dyn SchedulerPort>,
}

impl SchedulersService {
    pub fn new(schedulers: Arc<dyn SchedulerPort>) -> Self {
        Self { schedulers }
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn create_scheduler(
        &self,
        request: &CreateSchedulerRequest,
    ) -> AppResult<CreateSchedulerResponse> {
        let scheduler = Scheduler::from_request(request)?;
        let scheduler_id = scheduler.create(self.schedulers.as_ref()).await?;
        tracing::debug!(%scheduler_id, "Scheduler created");
        Ok(CreateSchedulerResponse { scheduler_id })
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update_scheduler(
        &self,
        scheduler_id: &str,
        request: &UpdateSchedulerRequest,
    ) -> AppResult<()> {
        let scheduler = Scheduler {
            scheduler_id: scheduler_id.to_string(),
            start_date: None,
            end_date: request.end_date,
            frequency: None,
        };
        scheduler.update(self.schedulers.as_ref()).await
    }

    pub async fn get_scheduler(&self, scheduler_id: &str) -> AppResult<SchedulerRecord> {
        Scheduler::get(self.schedulers.as_ref(), scheduler_id).await
    }

    /// Create one scheduler per entry and report the generated IDs by identity.
    ///
    /// Every entry is checked before anything is written; a single bad entry
    /// rejects the whole batch with the full list of problems.
    #[tracing::instrument(skip(self, request), fields(count = request.schedulers.len()))]
    pub async fn create_many_schedulers(
        &self,
        request: &CreateManySchedulersRequest,
    ) -> AppResult<CreateManySchedulersResponse> {
        let params = validate_batch(&request.schedulers)?;
        let map_schedulers = self.schedulers.create_many(&params).await?;
        tracing::info!("Created {} schedulers", map_schedulers.len());
        Ok(CreateManySchedulersResponse { map_schedulers })
    }
}

/// Check every entry, collecting all failures
pub fn validate_batch(
    entries: &[CreateSchedulerWithIdentityRequest],
) -> AppResult<Vec<CreateSchedulerParamWithIdentity>> {
    let mut errors = Vec::new();
    let mut params = Vec::with_capacity(entries.len());
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let mut reject = |err: DomainError| {
            errors.push(ItemError {
                index,
                identity: entry.identity.clone(),
                message: err.to_string(),
            })
        };

        if entry.identity.is_empty() {
            reject(DomainError::EmptyIdentity);
        } else if !seen.insert(entry.identity.as_str()) {
            reject(DomainError::DuplicateIdentity(entry.identity.clone()));
        }

        let Some(request) = &entry.request else {
            reject(DomainError::EmptyRequest);
            continue;
        };

        match Scheduler::from_request(request).and_then(|s| s.to_params()) {
            Ok(p) => params.push(CreateSchedulerParamWithIdentity {
                identity: entry.identity.clone(),
                params: p,
            }),
            Err(e) => reject(e),
        }
    }

    if !errors.is_empty() {
        return Err(AppError::BatchValidation(errors));
    }
    Ok(params)
}
