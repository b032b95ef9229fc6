//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{date_infos, health, schedulers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calendar API",
        version = "1.0.0",
        description = "Schedulers and day information REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Schedulers
        schedulers::create_scheduler,
        schedulers::create_many_schedulers,
        schedulers::get_scheduler,
        schedulers::update_scheduler,
        // Day infos
        date_infos::upsert_date_info,
        date_infos::duplicate_date_info,
        date_infos::fetch_date_info,
        date_infos::export_date_infos,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::error::ItemError,
            health::HealthResponse,
            crate::models::scheduler::SchedulerRecord,
            crate::models::scheduler::CreateSchedulerRequest,
            crate::models::scheduler::CreateSchedulerResponse,
            crate::models::scheduler::UpdateSchedulerRequest,
            crate::models::scheduler::CreateSchedulerWithIdentityRequest,
            crate::models::scheduler::CreateManySchedulersRequest,
            crate::models::scheduler::CreateManySchedulersResponse,
            crate::models::date_info::DateInfoRecord,
            crate::models::date_info::DateInfoDetailed,
            crate::models::date_info::DateInfoRequest,
            crate::models::date_info::UpsertDateInfoRequest,
            crate::models::date_info::RepeatInfo,
            crate::models::date_info::DuplicateDateInfoRequest,
            crate::models::date_info::DateInfoMutationResponse,
            crate::models::enums::SchedulerFrequency,
            crate::models::enums::DuplicationFrequency,
            crate::models::enums::DateType,
            crate::models::enums::DateInfoStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "schedulers", description = "Lesson recurrence schedulers"),
        (name = "date_infos", description = "Per-location day information")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_date_info_parameters() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let params = doc["paths"]["/date-infos"]["get"]["parameters"]
            .as_array()
            .expect("fetch has query parameters");

        let mut names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["end_date", "location_id", "start_date"]);
        assert!(params.iter().all(|p| p["in"] == "query"));
    }
}
