//! Scheduler models: the entity, its database row and request/response bodies

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, DomainError},
    repository::schedulers::SchedulerPort,
};

use super::enums::SchedulerFrequency;

/// Generate a new opaque scheduler ID
pub fn new_scheduler_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Recurrence pattern shared by the lessons that reference it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    pub scheduler_id: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub frequency: Option<SchedulerFrequency>,
}

/// Column values of a scheduler to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchedulerParams {
    pub scheduler_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub frequency: SchedulerFrequency,
}

/// Scheduler parameters tagged with the caller's identity (e.g. a lesson ID)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchedulerParamWithIdentity {
    pub identity: String,
    pub params: CreateSchedulerParams,
}

/// Partial update: only the end date can change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSchedulerParams {
    pub scheduler_id: String,
    pub end_date: DateTime<Utc>,
}

impl Scheduler {
    /// Build a scheduler with a fresh ID. Nothing is persisted.
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        frequency: Option<SchedulerFrequency>,
    ) -> Self {
        Self {
            scheduler_id: new_scheduler_id(),
            start_date,
            end_date,
            frequency,
        }
    }

    /// Build from an API request. An empty frequency is left unset so that
    /// `validate` reports it.
    pub fn from_request(request: &CreateSchedulerRequest) -> Result<Self, DomainError> {
        let frequency = if request.frequency.is_empty() {
            None
        } else {
            Some(SchedulerFrequency::parse(&request.frequency)?)
        };
        Ok(Self::new(request.start_date, request.end_date, frequency))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.to_params().map(|_| ())
    }

    /// Validated column values
    pub fn to_params(&self) -> Result<CreateSchedulerParams, DomainError> {
        let frequency = self.frequency.ok_or(DomainError::EmptyFrequency)?;
        let start_date = self.start_date.ok_or(DomainError::EmptyStartDate)?;
        let end_date = self.end_date.ok_or(DomainError::EmptyEndDate)?;
        if end_date < start_date {
            return Err(DomainError::InvalidRange {
                start: start_date.to_rfc3339(),
                end: end_date.to_rfc3339(),
            });
        }
        Ok(CreateSchedulerParams {
            scheduler_id: self.scheduler_id.clone(),
            start_date,
            end_date,
            frequency,
        })
    }

    /// Persist the scheduler and return its pre-generated ID
    pub async fn create(&self, port: &dyn SchedulerPort) -> AppResult<String> {
        let params = self.to_params()?;
        port.create(&params).await?;
        Ok(self.scheduler_id.clone())
    }

    /// Move the end date of an existing scheduler
    pub async fn update(&self, port: &dyn SchedulerPort) -> AppResult<()> {
        if self.scheduler_id.is_empty() {
            return Err(DomainError::EmptyField("scheduler_id").into());
        }
        let end_date = self.end_date.ok_or(DomainError::EmptyField("end date"))?;
        port.update(&UpdateSchedulerParams {
            scheduler_id: self.scheduler_id.clone(),
            end_date,
        })
        .await
    }

    pub async fn get(port: &dyn SchedulerPort, scheduler_id: &str) -> AppResult<SchedulerRecord> {
        if scheduler_id.is_empty() {
            return Err(AppError::Domain(DomainError::EmptyField("scheduler_id")));
        }
        port.get_by_id(scheduler_id).await
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// Scheduler as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchedulerRecord {
    pub scheduler_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// `once` or `weekly`; may be empty on legacy rows
    #[sqlx(rename = "freq")]
    pub frequency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

/// Create scheduler request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSchedulerRequest {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// `once` or `weekly`
    #[serde(default)]
    pub frequency: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSchedulerResponse {
    pub scheduler_id: String,
}

/// Update scheduler request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSchedulerRequest {
    pub end_date: Option<DateTime<Utc>>,
}

/// One entry of a batch create
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSchedulerWithIdentityRequest {
    /// Caller identity the generated ID is reported against
    #[serde(default)]
    pub identity: String,
    pub request: Option<CreateSchedulerRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateManySchedulersRequest {
    pub schedulers: Vec<CreateSchedulerWithIdentityRequest>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateManySchedulersResponse {
    /// identity -> scheduler ID
    pub map_schedulers: HashMap<String, String>,
}
