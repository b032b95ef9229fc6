//! Day info commands and queries

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use validator::Validate;

use crate::{
    error::{AppResult, DomainError},
    models::{
        date_info::{
            DateInfo, DateInfoDetailed, DateInfoMutationResponse, DateInfoRecord,
            DuplicateDateInfoRequest, FetchDateInfoQuery, UpsertDateInfoRequest,
        },
        duplication::DuplicationInfo,
    },
    repository::{date_infos::DateInfoPort, locations::LocationPort},
};

#[derive(Clone)]
pub struct DateInfosService {
    locations: Arc<dyn LocationPort>,
    date_infos: Arc<dyn DateInfoPort>,
}

impl DateInfosService {
    pub fn new(locations: Arc<dyn LocationPort>, date_infos: Arc<dyn DateInfoPort>) -> Self {
        Self {
            locations,
            date_infos,
        }
    }

    #[tracing::instrument(skip(self, request), fields(location_id = %request.date_info.location_id))]
    pub async fn upsert_date_info(
        &self,
        request: &UpsertDateInfoRequest,
    ) -> AppResult<DateInfoMutationResponse> {
        let date_info = DateInfo::from_request(&request.date_info)?;
        date_info
            .upsert(self.locations.as_ref(), self.date_infos.as_ref())
            .await?;

        Ok(DateInfoMutationResponse {
            successful: true,
            message: "day info saved".to_string(),
        })
    }

    /// Replicate the stored day info onto every occurrence of the repeat range
    #[tracing::instrument(skip(self, request), fields(location_id = %request.date_info.location_id))]
    pub async fn duplicate_date_info(
        &self,
        request: &DuplicateDateInfoRequest,
    ) -> AppResult<DateInfoMutationResponse> {
        let date_info = DateInfo::from_request(&request.date_info)?;

        let repeat = &request.repeat_info;
        let duplication = DuplicationInfo::new(
            repeat.start_date.map(start_of_day),
            repeat.end_date.map(start_of_day),
            &repeat.condition,
        )?;
        duplication.validate()?;

        let dates: Vec<NaiveDate> = duplication
            .retrieve_date_occurrences()
            .into_iter()
            .map(|d| d.date_naive())
            .collect();
        tracing::debug!("Duplicating day info onto {} dates", dates.len());

        date_info
            .duplicate(self.locations.as_ref(), self.date_infos.as_ref(), &dates)
            .await?;

        Ok(DateInfoMutationResponse {
            successful: true,
            message: format!("day info duplicated to {} dates", dates.len()),
        })
    }

    pub async fn fetch_date_info(&self, query: &FetchDateInfoQuery) -> AppResult<Vec<DateInfoDetailed>> {
        query.validate()?;
        if query.end_date < query.start_date {
            return Err(DomainError::InvalidRange {
                start: query.start_date.to_string(),
                end: query.end_date.to_string(),
            }
            .into());
        }

        self.date_infos
            .get_date_info_detailed_by_date_range_and_location_id(
                query.start_date,
                query.end_date,
                &query.location_id,
            )
            .await
    }

    pub async fn export_date_infos(&self) -> AppResult<Vec<DateInfoRecord>> {
        self.date_infos.get_all_to_export().await
    }
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
