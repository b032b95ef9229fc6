//! Calendar enums and their string lookups
//!
//! Lookups are case-insensitive exact matches. Surrounding whitespace is not
//! trimmed, so `" daily"` is rejected.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

// ---------------------------------------------------------------------------
// SchedulerFrequency
// ---------------------------------------------------------------------------

/// Repeat pattern of a lesson scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerFrequency {
    Once,
    Weekly,
}

impl SchedulerFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerFrequency::Once => "once",
            SchedulerFrequency::Weekly => "weekly",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_lowercase().as_str() {
            "once" => Ok(SchedulerFrequency::Once),
            "weekly" => Ok(SchedulerFrequency::Weekly),
            _ => Err(DomainError::UnsupportedFrequency(value.to_string())),
        }
    }
}

impl std::fmt::Display for SchedulerFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DuplicationFrequency
// ---------------------------------------------------------------------------

/// Cadence of generated occurrence dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DuplicationFrequency {
    Daily,
    Weekly,
}

impl DuplicationFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicationFrequency::Daily => "daily",
            DuplicationFrequency::Weekly => "weekly",
        }
    }

    /// Step between two occurrences, in days
    pub fn step_days(&self) -> i64 {
        match self {
            DuplicationFrequency::Daily => 1,
            DuplicationFrequency::Weekly => 7,
        }
    }
}

pub fn get_duplication_frequency(value: &str) -> Result<DuplicationFrequency, DomainError> {
    match value.to_lowercase().as_str() {
        "daily" => Ok(DuplicationFrequency::Daily),
        "weekly" => Ok(DuplicationFrequency::Weekly),
        _ => Err(DomainError::UnsupportedFrequency(value.to_string())),
    }
}

// ---------------------------------------------------------------------------
// DateType
// ---------------------------------------------------------------------------

/// Kind of a calendar day at a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateType {
    Regular,
    Seasonal,
    Spare,
    Closed,
}

impl DateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateType::Regular => "regular",
            DateType::Seasonal => "seasonal",
            DateType::Spare => "spare",
            DateType::Closed => "closed",
        }
    }
}

/// Empty input means "unset"
pub fn get_date_type_id(value: &str) -> Result<Option<DateType>, DomainError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.to_lowercase().as_str() {
        "regular" => Ok(Some(DateType::Regular)),
        "seasonal" => Ok(Some(DateType::Seasonal)),
        "spare" => Ok(Some(DateType::Spare)),
        "closed" => Ok(Some(DateType::Closed)),
        _ => Err(DomainError::UnsupportedDateType(value.to_string())),
    }
}

// ---------------------------------------------------------------------------
// DateInfoStatus
// ---------------------------------------------------------------------------

/// Publication status of a day info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateInfoStatus {
    None,
    Draft,
    Published,
}

impl DateInfoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateInfoStatus::None => "none",
            DateInfoStatus::Draft => "draft",
            DateInfoStatus::Published => "published",
        }
    }
}

/// Empty input means "unset"
pub fn get_date_info_status(value: &str) -> Result<Option<DateInfoStatus>, DomainError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.to_lowercase().as_str() {
        "none" => Ok(Some(DateInfoStatus::None)),
        "draft" => Ok(Some(DateInfoStatus::Draft)),
        "published" => Ok(Some(DateInfoStatus::Published)),
        _ => Err(DomainError::UnsupportedStatus(value.to_string())),
    }
}
