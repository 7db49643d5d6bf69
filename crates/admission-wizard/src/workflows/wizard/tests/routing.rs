use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use crate::workflows::wizard::timeline::ManualClock;
use crate::workflows::wizard::{wizard_router, SharedWizard};

type SharedTestWizard = SharedWizard<ManualClock, RecordingPresenter>;

fn shared(h: Harness) -> (SharedTestWizard, Arc<ManualClock>) {
    (Arc::new(Mutex::new(h.wizard)), h.clock)
}

async fn post_event(wizard: &SharedTestWizard, event: Value) -> (StatusCode, Value) {
    let response = wizard_router(wizard.clone())
        .oneshot(
            Request::post("/api/v1/wizard/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(event.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

async fn get_snapshot(wizard: &SharedTestWizard) -> Value {
    let response = wizard_router(wizard.clone())
        .oneshot(
            Request::get("/api/v1/wizard")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    read_json_body(response).await
}

#[tokio::test]
async fn snapshot_starts_on_search() {
    let (wizard, _) = shared(harness());

    let snapshot = get_snapshot(&wizard).await;
    assert_eq!(snapshot["view"], "search");
    assert_eq!(snapshot["submission_enabled"], false);
    assert_eq!(snapshot["busy"], false);
    assert_eq!(snapshot["sections"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn search_event_is_accepted_then_resolves_on_tick() {
    let (wizard, clock) = shared(harness());

    let (status, body) = post_event(
        &wizard,
        json!({
            "type": "submit_search",
            "student_id": KNOWN_ID,
            "application_number": KNOWN_APPLICATION,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["outcome"]["kind"], "pending");
    assert_eq!(body["outcome"]["operation"], "lookup");
    assert_eq!(body["snapshot"]["busy"], true);

    clock.advance(Duration::from_millis(1_500));
    let snapshot = get_snapshot(&wizard).await;
    assert_eq!(snapshot["view"], "results");
    assert_eq!(snapshot["record"]["application_number"], KNOWN_APPLICATION);
}

#[tokio::test]
async fn validation_errors_map_to_unprocessable_entity() {
    let (wizard, _) = shared(harness());

    let (status, body) = post_event(
        &wizard,
        json!({ "type": "submit_search", "student_id": " ", "application_number": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation");
    assert_eq!(body["snapshot"]["alerts"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn ignored_events_map_to_conflict() {
    let (wizard, _) = shared(harness());

    let (status, body) = post_event(&wizard, json!({ "type": "submit_payment" })).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["outcome"]["reason"], "unavailable");
    assert_eq!(body["snapshot"]["view"], "search");
}

#[tokio::test]
async fn receipt_upload_over_http_unlocks_submission() {
    let mut h = harness();
    h.reach_invoice();
    let (wizard, _) = shared(h);

    let (status, body) = post_event(
        &wizard,
        json!({
            "type": "file_selected",
            "file": { "name": "receipt.png", "mime_type": "image/png", "size_bytes": 2048 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["submission_enabled"], true);
    assert_eq!(body["snapshot"]["attachment"]["name"], "receipt.png");
}

#[tokio::test]
async fn malformed_event_is_rejected_by_extractor() {
    let (wizard, _) = shared(harness());

    let response = wizard_router(wizard)
        .oneshot(
            Request::post("/api/v1/wizard/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type":"teleport"}"#))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}
