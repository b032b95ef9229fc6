//! Repository integration tests against a real PostgreSQL
//!
//! Run with `DATABASE_URL=... cargo test --test repository_tests -- --ignored`

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tokio_test::{assert_err, assert_ok};

use calendar_server::{
    config::JobsConfig,
    error::AppError,
    jobs::{fill_scheduler::fill_scheduler_to_lessons, update_invalid_schedulers, JobParams},
    models::{
        date_info::{DateInfo, UpsertDateInfoParams},
        enums::SchedulerFrequency,
        scheduler::{new_scheduler_id, CreateSchedulerParamWithIdentity, CreateSchedulerParams},
    },
    repository::{
        date_infos::DateInfoPort, lessons::LessonPort, schedulers::SchedulerPort, Repository,
    },
};

async fn setup() -> (Pool<Postgres>, Repository) {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    (pool.clone(), Repository::new(pool))
}

async fn insert_location(pool: &Pool<Postgres>) -> String {
    let location_id = format!("loc-{}", new_scheduler_id());
    sqlx::query("INSERT INTO locations (location_id, name) VALUES ($1, 'Center')")
        .bind(&location_id)
        .execute(pool)
        .await
        .expect("Failed to insert location");
    location_id
}

fn day_params(location_id: &str, date: NaiveDate, opening_time: &str) -> UpsertDateInfoParams {
    UpsertDateInfoParams {
        date,
        location_id: location_id.to_string(),
        date_type_id: Some("regular".to_string()),
        opening_time: opening_time.to_string(),
        status: Some("draft".to_string()),
        time_zone: "UTC".to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn test_upsert_date_info_is_idempotent() {
    let (pool, repo) = setup().await;
    let location_id = insert_location(&pool).await;
    let date = NaiveDate::from_ymd_opt(2022, 9, 19).unwrap();

    assert_eq!(assert_ok!(repo.date_infos.upsert_date_info(&day_params(&location_id, date, "09:00")).await), 1);
    assert_eq!(assert_ok!(repo.date_infos.upsert_date_info(&day_params(&location_id, date, "10:00")).await), 1);

    let stored = assert_ok!(
        repo.date_infos
            .get_date_info_by_date_and_location_id(date, &location_id)
            .await
    );
    assert_eq!(stored.date, date);
    assert_eq!(stored.location_id, location_id);
    assert_eq!(stored.date_type_id.as_deref(), Some("regular"));
    assert_eq!(stored.opening_time.as_deref(), Some("10:00"));
    assert_eq!(stored.status.as_deref(), Some("draft"));
    assert_eq!(stored.time_zone.as_deref(), Some("UTC"));
}

#[tokio::test]
#[ignore]
async fn test_date_info_round_trip_through_entity() {
    let (pool, repo) = setup().await;
    let location_id = insert_location(&pool).await;
    let date = NaiveDate::from_ymd_opt(2022, 12, 25).unwrap();

    let closed = assert_ok!(DateInfo::new(
        Some(date),
        location_id.as_str(),
        "Closed",
        "",
        "PUBLISHED",
        "Europe/Paris",
    ));
    assert_ok!(closed.upsert(&repo.locations, &repo.date_infos).await);
    // Same values again: still exactly one row
    assert_ok!(closed.upsert(&repo.locations, &repo.date_infos).await);

    let stored = assert_ok!(
        repo.date_infos
            .get_date_info_by_date_and_location_id(date, &location_id)
            .await
    );
    assert_eq!(stored.date_type_id.as_deref(), Some("closed"));
    assert_eq!(stored.status.as_deref(), Some("published"));
    assert_eq!(stored.opening_time.as_deref(), Some(""));
    assert_eq!(stored.time_zone.as_deref(), Some("Europe/Paris"));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_date_info_overwrites_existing_days() {
    let (pool, repo) = setup().await;
    let location_id = insert_location(&pool).await;
    let first = NaiveDate::from_ymd_opt(2022, 9, 19).unwrap();
    let dates: Vec<NaiveDate> = (0..4).map(|w| first + chrono::Duration::days(7 * w)).collect();

    // One target day already exists with other values
    assert_ok!(
        repo.date_infos
            .upsert_date_info(&day_params(&location_id, dates[2], "12:00"))
            .await
    );

    let params: Vec<_> = dates
        .iter()
        .map(|d| day_params(&location_id, *d, "09:00"))
        .collect();
    assert_eq!(assert_ok!(repo.date_infos.duplicate_date_info(&params).await), 4);

    let rows = assert_ok!(
        repo.date_infos
            .get_date_info_detailed_by_date_range_and_location_id(dates[0], dates[3], &location_id)
            .await
    );
    assert_eq!(rows.len(), 4);
    assert!(rows
        .iter()
        .all(|r| r.date_info.opening_time.as_deref() == Some("09:00")));
    assert_eq!(rows[0].day_type_display_name.as_deref(), Some("Regular"));
}

#[tokio::test]
#[ignore]
async fn test_missing_date_info_is_not_found() {
    let (_pool, repo) = setup().await;
    let date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();

    let err = assert_err!(
        repo.date_infos
            .get_date_info_by_date_and_location_id(date, "no-such-location")
            .await
    );
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_create_many_maps_every_identity() {
    let (_pool, repo) = setup().await;
    let start = Utc.with_ymd_and_hms(2022, 9, 19, 9, 0, 0).unwrap();

    let params: Vec<CreateSchedulerParamWithIdentity> = ["a", "b", "c"]
        .iter()
        .map(|identity| CreateSchedulerParamWithIdentity {
            identity: identity.to_string(),
            params: CreateSchedulerParams {
                scheduler_id: new_scheduler_id(),
                start_date: start,
                end_date: start,
                frequency: SchedulerFrequency::Once,
            },
        })
        .collect();

    let map = assert_ok!(repo.schedulers.create_many(&params).await);
    assert_eq!(map.len(), 3);
    for p in &params {
        assert_eq!(map[&p.identity], p.params.scheduler_id);
        let stored = assert_ok!(repo.schedulers.get_by_id(&p.params.scheduler_id).await);
        assert_eq!(stored.frequency.as_deref(), Some("once"));
    }

    assert!(assert_ok!(repo.schedulers.create_many(&[]).await).is_empty());
}

#[tokio::test]
#[ignore]
async fn test_fill_and_repair_jobs() {
    let (pool, repo) = setup().await;
    let resource_path = format!("tenant-{}", new_scheduler_id());
    let start = Utc.with_ymd_and_hms(2022, 9, 19, 9, 0, 0).unwrap();

    let mut lesson_ids = Vec::new();
    for i in 0..5 {
        let lesson_id = format!("{}-lesson-{}", resource_path, i);
        sqlx::query(
            "INSERT INTO lessons (lesson_id, start_time, end_time, resource_path) VALUES ($1, $2, $3, $4)",
        )
        .bind(&lesson_id)
        .bind(start)
        .bind(start + chrono::Duration::hours(1))
        .bind(&resource_path)
        .execute(&pool)
        .await
        .expect("Failed to insert lesson");
        lesson_ids.push(lesson_id);
    }

    let lessons: Arc<dyn LessonPort> = Arc::new(repo.lessons.clone());
    let schedulers: Arc<dyn SchedulerPort> = Arc::new(repo.schedulers.clone());
    let params = JobParams {
        page_size: 2,
        workers: 2,
        ..JobParams::new(resource_path.clone(), "tester", &JobsConfig::default())
    };

    let summary = assert_ok!(
        fill_scheduler_to_lessons(&params, Arc::clone(&lessons), Arc::clone(&schedulers)).await
    );
    assert_eq!(summary.lessons_filled, 5);
    assert_eq!(summary.pages_failed, 0);
    assert!(assert_ok!(lessons.get_lessons_without_scheduler(&resource_path, 0, 10).await).is_empty());

    // Point two lessons at a scheduler that does not exist
    let dangling = new_scheduler_id();
    let mut ids = HashMap::new();
    ids.insert(lesson_ids[0].clone(), dangling.clone());
    ids.insert(lesson_ids[1].clone(), dangling.clone());
    assert_eq!(assert_ok!(lessons.update_lesson_scheduler_ids(&ids).await), 2);

    let repaired = assert_ok!(
        update_invalid_schedulers::update_invalid_schedulers(&params, lessons, Arc::clone(&schedulers)).await
    );
    assert_eq!(repaired.repaired, 1);

    let stored = assert_ok!(schedulers.get_by_id(&dangling).await);
    assert_eq!(stored.frequency.as_deref(), Some("weekly"));
}

#[tokio::test]
#[ignore]
async fn test_repair_revives_deleted_scheduler() {
    let (pool, repo) = setup().await;
    let resource_path = format!("tenant-{}", new_scheduler_id());
    let scheduler_id = new_scheduler_id();
    let start = Utc.with_ymd_and_hms(2022, 9, 19, 9, 0, 0).unwrap();

    sqlx::query(
        "INSERT INTO scheduler (scheduler_id, start_date, end_date, freq, deleted_at) VALUES ($1, $2, $2, 'once', now())",
    )
    .bind(&scheduler_id)
    .bind(start)
    .execute(&pool)
    .await
    .expect("Failed to insert scheduler");
    sqlx::query(
        "INSERT INTO lessons (lesson_id, start_time, end_time, scheduler_id, resource_path) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(format!("{}-lesson", resource_path))
    .bind(start)
    .bind(start + chrono::Duration::hours(1))
    .bind(&scheduler_id)
    .bind(&resource_path)
    .execute(&pool)
    .await
    .expect("Failed to insert lesson");

    let lessons: Arc<dyn LessonPort> = Arc::new(repo.lessons.clone());
    let schedulers: Arc<dyn SchedulerPort> = Arc::new(repo.schedulers.clone());
    let params = JobParams::new(resource_path.clone(), "tester", &JobsConfig::default());

    let first = assert_ok!(
        update_invalid_schedulers::update_invalid_schedulers(&params, Arc::clone(&lessons), Arc::clone(&schedulers)).await
    );
    assert_eq!(first.repaired, 1);

    let stored = assert_ok!(schedulers.get_by_id(&scheduler_id).await);
    assert!(stored.deleted_at.is_none());
    assert_eq!(stored.frequency.as_deref(), Some("once"));

    // Nothing left to repair on a second run
    let second = assert_ok!(
        update_invalid_schedulers::update_invalid_schedulers(&params, lessons, schedulers).await
    );
    assert_eq!(second.repaired, 0);
    assert_eq!(second.failed, 0);
}
