//! API handlers for the calendar REST endpoints

pub mod date_infos;
pub mod health;
pub mod openapi;
pub mod schedulers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Schedulers
        .route("/schedulers", post(schedulers::create_scheduler))
        .route("/schedulers/batch", post(schedulers::create_many_schedulers))
        .route(
            "/schedulers/:id",
            get(schedulers::get_scheduler).put(schedulers::update_scheduler),
        )
        // Day infos
        .route(
            "/date-infos",
            get(date_infos::fetch_date_info).post(date_infos::upsert_date_info),
        )
        .route("/date-infos/duplicate", post(date_infos::duplicate_date_info))
        .route("/date-infos/export", get(date_infos::export_date_infos))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
