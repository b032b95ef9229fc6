//! Scheduler API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::scheduler::{
        CreateManySchedulersRequest, CreateManySchedulersResponse, CreateSchedulerRequest,
        CreateSchedulerResponse, SchedulerRecord, UpdateSchedulerRequest,
    },
};

/// Create a scheduler
#[utoipa::path(
    post,
    path = "/schedulers",
    tag = "schedulers",
    request_body = CreateSchedulerRequest,
    responses(
        (status = 201, description = "Scheduler created", body = CreateSchedulerResponse),
        (status = 400, description = "Invalid scheduler", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_scheduler(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateSchedulerRequest>,
) -> AppResult<(StatusCode, Json<CreateSchedulerResponse>)> {
    let created = state.services.schedulers.create_scheduler(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create many schedulers, keyed by caller identity
#[utoipa::path(
    post,
    path = "/schedulers/batch",
    tag = "schedulers",
    request_body = CreateManySchedulersRequest,
    responses(
        (status = 200, description = "identity -> scheduler ID", body = CreateManySchedulersResponse),
        (status = 400, description = "At least one invalid entry; nothing created", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_many_schedulers(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateManySchedulersRequest>,
) -> AppResult<Json<CreateManySchedulersResponse>> {
    let created = state.services.schedulers.create_many_schedulers(&data).await?;
    Ok(Json(created))
}

/// Get a scheduler
#[utoipa::path(
    get,
    path = "/schedulers/{id}",
    tag = "schedulers",
    params(("id" = String, Path, description = "Scheduler ID")),
    responses(
        (status = 200, description = "Scheduler", body = SchedulerRecord),
        (status = 404, description = "Scheduler not found")
    )
)]
pub async fn get_scheduler(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SchedulerRecord>> {
    let scheduler = state.services.schedulers.get_scheduler(&id).await?;
    Ok(Json(scheduler))
}

/// Move the end date of a scheduler
#[utoipa::path(
    put,
    path = "/schedulers/{id}",
    tag = "schedulers",
    params(("id" = String, Path, description = "Scheduler ID")),
    request_body = UpdateSchedulerRequest,
    responses(
        (status = 200, description = "Scheduler updated"),
        (status = 404, description = "Scheduler not found")
    )
)]
pub async fn update_scheduler(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateSchedulerRequest>,
) -> AppResult<Json<serde_json::Value>> {
    state.services.schedulers.update_scheduler(&id, &data).await?;
    Ok(Json(serde_json::json!({})))
}
