#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use chrono::NaiveDate;
use common::{build_state, unreachable_source, InMemoryStore, RecordingNotifier};
use serde_json::Value;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_five_frontend(store: &InMemoryStore) {
    store.seed_project("Landing", "frontend", false, 1, "HTML, CSS");
    store.seed_project("Dashboard", "frontend", true, 2, "React,TypeScript");
    store.seed_project("Portfolio", "frontend", false, 3, "A,B,C");
    store.seed_project("Shop", "frontend", true, 4, "Vue");
    store.seed_project("Blog", "frontend", false, 5, "Svelte");
    store.seed_project("Api Gateway", "backend", true, 6, "Rust");
}

#[actix_rt::test]
async fn projects_are_paginated_featured_first() {
    let store = InMemoryStore::new();
    seed_five_frontend(&store);
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/php/get_projects.php?category=frontend&limit=2&offset=0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["title"], "Shop");
    assert_eq!(data[1]["title"], "Dashboard");
    assert!(data.iter().all(|p| p["featured"] == true));
    assert_eq!(
        body["pagination"],
        serde_json::json!({"total": 5, "limit": 2, "offset": 0, "has_more": true})
    );
}

#[actix_rt::test]
async fn project_technologies_are_listed() {
    let store = InMemoryStore::new();
    seed_five_frontend(&store);
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/php/get_projects.php?search=portfolio")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"][0]["technologies"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["has_more"], false);
}

#[actix_rt::test]
async fn project_paging_parameters_are_clamped() {
    let store = InMemoryStore::new();
    seed_five_frontend(&store);
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/php/get_projects.php?category=all&limit=500&offset=-4")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["limit"], 100);
    assert_eq!(body["pagination"]["offset"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let req = test::TestRequest::get()
        .uri("/php/get_projects.php?limit=abc")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["limit"], 6);
}

#[actix_rt::test]
async fn experience_lists_current_jobs_first_without_end_date() {
    let store = InMemoryStore::new();
    store.seed_experience("Junior Dev", date(2018, 1, 1), Some(date(2019, 3, 1)), false);
    store.seed_experience("Lead Dev", date(2022, 5, 1), None, true);
    store.seed_experience("Senior Dev", date(2019, 4, 1), Some(date(2022, 4, 1)), false);
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/php/get_experience.php").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = body["data"].as_array().unwrap();

    assert_eq!(data[0]["position"], "Lead Dev");
    assert!(data[0].get("end_date").is_none());
    assert!(data[0].get("duration").is_none());
    assert_eq!(data[1]["position"], "Senior Dev");
    assert_eq!(data[1]["start_date"], "Apr 2019");
    assert_eq!(data[1]["duration"], "3 years");
    assert_eq!(data[2]["technologies_used"], serde_json::json!(["Rust", "SQL"]));
}

#[actix_rt::test]
async fn gallery_is_ordered_by_display_order() {
    let store = InMemoryStore::new();
    store.seed_photo("Second", "Travel", 2);
    store.seed_photo("First", "Events", 1);
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/php/get_gallery.php").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"][0]["title"], "First");
    assert_eq!(body["data"][1]["title"], "Second");
}

#[actix_rt::test]
async fn about_combines_personal_info_stats_and_sections() {
    let store = InMemoryStore::new();
    store.seed_about();
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/php/get_about.php").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["personal_info"]["name"], "Ada Lovelace");
    assert_eq!(body["data"]["stats"][0]["value"], "50+");
    assert_eq!(body["data"]["sections"][0]["title"], "Journey");
}

#[actix_rt::test]
async fn missing_personal_info_is_reported() {
    let store = InMemoryStore::new();
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/php/get_personal_info.php").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No personal information found");
}

#[actix_rt::test]
async fn storage_failure_hides_detail() {
    let store = InMemoryStore::new();
    store.fail_storage();
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/php/get_skills.php").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Database error occurred");
}

#[actix_rt::test]
async fn connection_diagnostics_count_about_tables() {
    let store = InMemoryStore::new();
    store.seed_about();
    let state = build_state(&store, Arc::new(RecordingNotifier::default()), unreachable_source());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/php/test_connection.php").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["tables"]["personal_info"]["rows"], 1);
    assert_eq!(body["tables"]["about_sections"]["rows"], 1);
}
