//! API integration tests
//!
//! Expect a running server with a migrated database:
//! `cargo test --test api_tests -- --ignored`

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_create_then_update_scheduler() {
    let client = Client::new();

    let response = client
        .post(format!("{}/schedulers", BASE_URL))
        .json(&json!({
            "start_date": "2022-09-19T09:00:00Z",
            "end_date": "2022-12-19T09:00:00Z",
            "frequency": "weekly"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    let scheduler_id = body["scheduler_id"].as_str().expect("No scheduler_id").to_string();

    let response = client
        .put(format!("{}/schedulers/{}", BASE_URL, scheduler_id))
        .json(&json!({ "end_date": "2023-01-09T09:00:00Z" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/schedulers/{}", BASE_URL, scheduler_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["end_date"], "2023-01-09T09:00:00Z");
    assert_eq!(body["frequency"], "weekly");
}

#[tokio::test]
#[ignore]
async fn test_create_scheduler_inverted_range() {
    let client = Client::new();

    let response = client
        .post(format!("{}/schedulers", BASE_URL))
        .json(&json!({
            "start_date": "2022-12-19T09:00:00Z",
            "end_date": "2022-09-19T09:00:00Z",
            "frequency": "once"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 4);
}

#[tokio::test]
#[ignore]
async fn test_get_unknown_scheduler() {
    let client = Client::new();

    let response = client
        .get(format!("{}/schedulers/does-not-exist", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_create_many_schedulers() {
    let client = Client::new();

    let response = client
        .post(format!("{}/schedulers/batch", BASE_URL))
        .json(&json!({
            "schedulers": [
                {
                    "identity": "lesson-a",
                    "request": {
                        "start_date": "2022-09-19T09:00:00Z",
                        "end_date": "2022-09-19T09:00:00Z",
                        "frequency": "once"
                    }
                },
                {
                    "identity": "lesson-b",
                    "request": {
                        "start_date": "2022-09-19T09:00:00Z",
                        "end_date": "2022-12-19T09:00:00Z",
                        "frequency": "weekly"
                    }
                }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let map = body["map_schedulers"].as_object().expect("No map_schedulers");
    assert_eq!(map.len(), 2);
    assert_ne!(map["lesson-a"], map["lesson-b"]);
}

#[tokio::test]
#[ignore]
async fn test_create_many_schedulers_rejects_whole_batch() {
    let client = Client::new();

    let response = client
        .post(format!("{}/schedulers/batch", BASE_URL))
        .json(&json!({
            "schedulers": [
                {
                    "identity": "lesson-a",
                    "request": {
                        "start_date": "2022-09-19T09:00:00Z",
                        "end_date": "2022-09-19T09:00:00Z",
                        "frequency": "once"
                    }
                },
                { "identity": "lesson-b" }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    let details = body["details"].as_array().expect("No details");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["identity"], "lesson-b");
}

#[tokio::test]
#[ignore]
async fn test_fetch_date_info_requires_location() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/date-infos?start_date=2022-09-01&end_date=2022-09-30&location_id=",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_date_info_unknown_condition() {
    let client = Client::new();

    let response = client
        .post(format!("{}/date-infos/duplicate", BASE_URL))
        .json(&json!({
            "date_info": {
                "date": "2022-09-19",
                "location_id": "loc-1",
                "date_type_id": "regular",
                "opening_time": "09:00",
                "status": "draft",
                "timezone": "UTC"
            },
            "repeat_info": {
                "start_date": "2022-09-19",
                "end_date": "2022-10-19",
                "condition": "monthly"
            }
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
