//! Duplication info: a date range plus a cadence, expanded into occurrences

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;

use super::enums::{get_duplication_frequency, DuplicationFrequency};

/// Date range and cadence used to replicate a day info.
///
/// Not persisted. Dates are UTC timestamps; unset dates are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationInfo {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub frequency: Option<DuplicationFrequency>,
}

impl DuplicationInfo {
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        frequency: &str,
    ) -> Result<Self, DomainError> {
        let frequency = get_duplication_frequency(frequency)?;
        Ok(Self {
            start_date,
            end_date,
            frequency: Some(frequency),
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let start = self.start_date.ok_or(DomainError::EmptyField("start date"))?;
        let end = self.end_date.ok_or(DomainError::EmptyField("end date"))?;
        if self.frequency.is_none() {
            return Err(DomainError::EmptyField("frequency"));
        }
        if end < start {
            return Err(DomainError::InvalidRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(())
    }

    /// Every occurrence between start and end, both inclusive, ascending.
    ///
    /// The day count is the whole number of 24h periods in the range, so a
    /// weekly cadence never goes past the end date. Returns nothing when a
    /// field is unset or the range is inverted.
    pub fn retrieve_date_occurrences(&self) -> Vec<DateTime<Utc>> {
        let (Some(start), Some(end), Some(frequency)) =
            (self.start_date, self.end_date, self.frequency)
        else {
            return Vec::new();
        };

        let num_of_days = (end - start).num_days();
        if num_of_days < 0 {
            return Vec::new();
        }

        let step = frequency.step_days();
        (0..=num_of_days)
            .step_by(step as usize)
            .map(|i| start + Duration::days(i))
            .collect()
    }
}
