//! Day info models: per-location calendar day overrides

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult, DomainError},
    repository::{date_infos::DateInfoPort, locations::LocationPort},
};

use super::enums::{get_date_info_status, get_date_type_id, DateInfoStatus, DateType};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Opening information of one location on one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInfo {
    pub date: Option<NaiveDate>,
    pub location_id: String,
    pub date_type_id: Option<DateType>,
    /// Empty for closed days
    pub opening_time: String,
    pub status: Option<DateInfoStatus>,
    /// IANA time zone name
    pub time_zone: String,
}

/// Column values written by an upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertDateInfoParams {
    pub date: NaiveDate,
    pub location_id: String,
    pub date_type_id: Option<String>,
    pub opening_time: String,
    pub status: Option<String>,
    pub time_zone: String,
}

impl DateInfo {
    /// Parse date type and status. Empty strings leave them unset.
    pub fn new(
        date: Option<NaiveDate>,
        location_id: impl Into<String>,
        date_type_id: &str,
        opening_time: impl Into<String>,
        status: &str,
        time_zone: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            date,
            location_id: location_id.into(),
            date_type_id: get_date_type_id(date_type_id)?,
            opening_time: opening_time.into(),
            status: get_date_info_status(status)?,
            time_zone: time_zone.into(),
        })
    }

    pub fn from_request(request: &DateInfoRequest) -> Result<Self, DomainError> {
        Self::new(
            request.date,
            request.location_id.as_str(),
            &request.date_type_id,
            request.opening_time.as_str(),
            &request.status,
            request.timezone.as_str(),
        )
    }

    /// Field checks followed by a location existence check
    pub async fn validate(&self, locations: &dyn LocationPort) -> AppResult<NaiveDate> {
        let date = self.date.ok_or(DomainError::EmptyDate)?;
        if self.location_id.is_empty() {
            return Err(DomainError::EmptyLocationId.into());
        }
        if self.date_type_id == Some(DateType::Closed) && !self.opening_time.is_empty() {
            return Err(DomainError::InvalidClosedDayOpeningTime.into());
        }

        locations
            .get_location_by_id(&self.location_id)
            .await
            .map_err(|e| DomainError::LocationNotFound(format!("{}: {}", self.location_id, e)))?;

        Ok(date)
    }

    fn to_params(&self, date: NaiveDate) -> UpsertDateInfoParams {
        UpsertDateInfoParams {
            date,
            location_id: self.location_id.clone(),
            date_type_id: self.date_type_id.map(|t| t.as_str().to_string()),
            opening_time: self.opening_time.clone(),
            status: self.status.map(|s| s.as_str().to_string()),
            time_zone: self.time_zone.clone(),
        }
    }

    /// Insert or overwrite the row at `(date, location_id)`
    pub async fn upsert(
        &self,
        locations: &dyn LocationPort,
        date_infos: &dyn DateInfoPort,
    ) -> AppResult<()> {
        let date = self.validate(locations).await?;

        let affected = date_infos.upsert_date_info(&self.to_params(date)).await?;
        if affected != 1 {
            return Err(AppError::RowsAffected {
                expected: 1,
                actual: affected,
            });
        }
        Ok(())
    }

    /// Copy the stored row at `(date, location_id)` onto every date in `dates`.
    ///
    /// The stored row, not `self`, is the source of the copied attributes.
    pub async fn duplicate(
        &self,
        locations: &dyn LocationPort,
        date_infos: &dyn DateInfoPort,
        dates: &[NaiveDate],
    ) -> AppResult<()> {
        let date = self.validate(locations).await?;
        if dates.is_empty() {
            return Ok(());
        }

        let stored = date_infos
            .get_date_info_by_date_and_location_id(date, &self.location_id)
            .await?;

        let params: Vec<UpsertDateInfoParams> = dates
            .iter()
            .map(|d| stored.to_params(*d))
            .collect();

        let affected = date_infos.duplicate_date_info(&params).await?;
        let expected = params.len() as u64;
        if affected != expected {
            return Err(AppError::RowsAffected {
                expected,
                actual: affected,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Day info as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DateInfoRecord {
    pub date: NaiveDate,
    pub location_id: String,
    #[sqlx(rename = "day_type_id")]
    pub date_type_id: Option<String>,
    pub opening_time: Option<String>,
    pub status: Option<String>,
    pub time_zone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DateInfoRecord {
    /// Same attributes, another date
    pub fn to_params(&self, date: NaiveDate) -> UpsertDateInfoParams {
        UpsertDateInfoParams {
            date,
            location_id: self.location_id.clone(),
            date_type_id: self.date_type_id.clone(),
            opening_time: self.opening_time.clone().unwrap_or_default(),
            status: self.status.clone(),
            time_zone: self.time_zone.clone().unwrap_or_default(),
        }
    }
}

/// Day info joined with its day type
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DateInfoDetailed {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub date_info: DateInfoRecord,
    /// Display name of the day type, if any
    pub day_type_display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

/// Day info as sent by clients
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DateInfoRequest {
    /// Date (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub location_id: String,
    /// regular, seasonal, spare or closed
    #[serde(default)]
    pub date_type_id: String,
    #[serde(default)]
    pub opening_time: String,
    /// none, draft or published
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timezone: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertDateInfoRequest {
    pub date_info: DateInfoRequest,
}

/// Range and cadence of a duplication
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RepeatInfo {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// daily or weekly
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DuplicateDateInfoRequest {
    pub date_info: DateInfoRequest,
    pub repeat_info: RepeatInfo,
}

/// Outcome of an upsert or a duplication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DateInfoMutationResponse {
    pub successful: bool,
    pub message: String,
}

/// Query parameters for fetching day infos
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct FetchDateInfoQuery {
    /// Start date (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// End date (YYYY-MM-DD)
    pub end_date: NaiveDate,
    #[validate(length(min = 1, message = "location_id cannot be empty"))]
    pub location_id: String,
}
