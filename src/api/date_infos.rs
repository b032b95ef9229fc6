//! Day info API endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::date_info::{
        DateInfoDetailed, DateInfoMutationResponse, DateInfoRecord, DuplicateDateInfoRequest,
        FetchDateInfoQuery, UpsertDateInfoRequest,
    },
};

/// Create or overwrite the day info of a location
#[utoipa::path(
    post,
    path = "/date-infos",
    tag = "date_infos",
    request_body = UpsertDateInfoRequest,
    responses(
        (status = 200, description = "Day info saved", body = DateInfoMutationResponse),
        (status = 400, description = "Invalid day info", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_date_info(
    State(state): State<crate::AppState>,
    Json(data): Json<UpsertDateInfoRequest>,
) -> AppResult<Json<DateInfoMutationResponse>> {
    let resp = state.services.date_infos.upsert_date_info(&data).await?;
    Ok(Json(resp))
}

/// Copy a stored day info onto every occurrence of a repeat range
#[utoipa::path(
    post,
    path = "/date-infos/duplicate",
    tag = "date_infos",
    request_body = DuplicateDateInfoRequest,
    responses(
        (status = 200, description = "Day info duplicated", body = DateInfoMutationResponse),
        (status = 400, description = "Invalid day info or repeat range", body = crate::error::ErrorResponse)
    )
)]
pub async fn duplicate_date_info(
    State(state): State<crate::AppState>,
    Json(data): Json<DuplicateDateInfoRequest>,
) -> AppResult<Json<DateInfoMutationResponse>> {
    let resp = state.services.date_infos.duplicate_date_info(&data).await?;
    Ok(Json(resp))
}

/// List day infos of a location within a date range
#[utoipa::path(
    get,
    path = "/date-infos",
    tag = "date_infos",
    params(FetchDateInfoQuery),
    responses(
        (status = 200, description = "Day infos", body = Vec<DateInfoDetailed>)
    )
)]
pub async fn fetch_date_info(
    State(state): State<crate::AppState>,
    Query(query): Query<FetchDateInfoQuery>,
) -> AppResult<Json<Vec<DateInfoDetailed>>> {
    let rows = state.services.date_infos.fetch_date_info(&query).await?;
    Ok(Json(rows))
}

/// All day infos, for export
#[utoipa::path(
    get,
    path = "/date-infos/export",
    tag = "date_infos",
    responses(
        (status = 200, description = "Every live day info", body = Vec<DateInfoRecord>)
    )
)]
pub async fn export_date_infos(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<DateInfoRecord>>> {
    let rows = state.services.date_infos.export_date_infos().await?;
    Ok(Json(rows))
}
