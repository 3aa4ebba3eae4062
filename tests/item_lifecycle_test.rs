//! Tests for item intake, classification at the boundary, the lifecycle
//! transition table, the audit trail, and terminal disposal.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};

const OWNER: &str = "amy@campus.edu";
const STRANGER: &str = "mallory@campus.edu";

async fn seed_item(app: &TestApp, name: &str, category: &str, condition: &str, age: i64) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({
                "name": name,
                "department": "Sciences",
                "category": category,
                "age_months": age,
                "condition": condition,
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await
}

async fn update_status(app: &TestApp, item_id: &str, user: &str, status: &str) -> axum::response::Response {
    app.request(
        Method::POST,
        &format!("/api/v1/items/{}/status", item_id),
        Some(json!({ "user_email": user, "status": status })),
    )
    .await
}

#[tokio::test]
async fn new_items_start_reported_with_derived_classification() {
    let app = TestApp::new().await;

    let battery = seed_item(&app, "UPS battery", "Battery", "Dead", 60).await;
    assert_eq!(battery["status"], json!("Reported"));
    assert_eq!(battery["classification"]["type"], json!("Hazardous"));
    assert_eq!(
        battery["classification"]["notes"],
        json!("Contains hazardous materials.")
    );

    let laptop = seed_item(&app, "ThinkPad", "Computer", "Good", 10).await;
    assert_eq!(laptop["classification"]["type"], json!("Reusable"));

    let old_laptop = seed_item(&app, "ThinkPad", "Computer", "Good", 60).await;
    assert_eq!(old_laptop["classification"]["type"], json!("Recyclable"));
    assert_eq!(old_laptop["classification"]["notes"], json!(""));
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "name": "No owner", "department": "Hostel" })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn lifecycle_skips_and_stranger_updates_are_rejected() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "Projector", "Projector", "Fair", 20).await;
    let item_id = item["id"].as_str().unwrap();

    // Reported -> Collected skips the Scheduled stage
    let skip = update_status(&app, item_id, OWNER, "Collected").await;
    assert_eq!(skip.status(), 400);

    // A non-owner cannot tell this item exists
    let foreign = update_status(&app, item_id, STRANGER, "Scheduled").await;
    assert_eq!(foreign.status(), 404);

    // Decomposed is reserved for the dispose operation
    let decompose = update_status(&app, item_id, OWNER, "Decomposed").await;
    assert_eq!(decompose.status(), 400);
}

#[tokio::test]
async fn status_updates_append_one_audit_entry_each() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "Projector", "Projector", "Fair", 20).await;
    let item_id = item["id"].as_str().unwrap();
    assert_eq!(item["audit_trail"].as_array().unwrap().len(), 0);

    let scheduled = response_json(update_status(&app, item_id, OWNER, "Scheduled").await).await;
    assert_eq!(scheduled["status"], json!("Scheduled"));
    assert_eq!(scheduled["audit_trail"].as_array().unwrap().len(), 1);

    let collected = response_json(update_status(&app, item_id, OWNER, "Collected").await).await;
    let trail = collected["audit_trail"].as_array().unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[1]["status"], json!("Collected"));
    assert_eq!(trail[1]["user"], json!(OWNER));
    assert_eq!(trail[1]["stage"], json!("Collected"));

    // Full chain to a terminal outcome
    for status in ["Sorted", "Processed", "Recycled"] {
        let response = update_status(&app, item_id, OWNER, status).await;
        assert_eq!(response.status(), 200, "transition to {}", status);
    }

    // Terminal states admit nothing further
    let after_terminal = update_status(&app, item_id, OWNER, "Collected").await;
    assert_eq!(after_terminal.status(), 400);
}

#[tokio::test]
async fn dispose_is_terminal_and_idempotence_guarded() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "CRT monitor", "Other", "Dead", 120).await;
    let item_id = item["id"].as_str().unwrap();

    let disposed = app
        .request(
            Method::POST,
            &format!("/api/v1/items/{}/dispose", item_id),
            Some(json!({ "user_email": OWNER })),
        )
        .await;
    assert_eq!(disposed.status(), 200);
    let body = response_json(disposed).await;
    assert_eq!(body["status"], json!("Decomposed"));
    assert_eq!(body["disposed_by"], json!(OWNER));
    assert!(body["disposed_at"].is_string());
    let history = body["disposal_history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["action"], json!("Decomposed"));

    // A second dispose is rejected and appends nothing
    let again = app
        .request(
            Method::POST,
            &format!("/api/v1/items/{}/dispose", item_id),
            Some(json!({ "user_email": OWNER })),
        )
        .await;
    assert_eq!(again.status(), 409);

    let current = response_json(
        app.request(Method::GET, &format!("/api/v1/items/{}", item_id), None)
            .await,
    )
    .await;
    assert_eq!(current["disposal_history"].as_array().unwrap().len(), 1);
    assert_eq!(current["disposed_at"], body["disposed_at"]);
}

#[tokio::test]
async fn updates_are_owner_gated_and_preserve_classification() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "ThinkPad", "Computer", "Good", 10).await;
    let item_id = item["id"].as_str().unwrap();
    assert_eq!(item["classification"]["type"], json!("Reusable"));

    // A stranger sees 404, not 403
    let foreign = app
        .request(
            Method::PATCH,
            &format!("/api/v1/items/{}", item_id),
            Some(json!({ "user_email": STRANGER, "name": "Stolen" })),
        )
        .await;
    assert_eq!(foreign.status(), 404);

    // Owner update keeps the stored classification unless overridden
    let renamed = response_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/items/{}", item_id),
            Some(json!({ "user_email": OWNER, "name": "ThinkPad T14", "age_months": 60 })),
        )
        .await,
    )
    .await;
    assert_eq!(renamed["name"], json!("ThinkPad T14"));
    assert_eq!(renamed["age_months"], json!(60));
    assert_eq!(renamed["classification"]["type"], json!("Reusable"));
    assert_eq!(renamed["version"], json!(2));

    // Explicit override wins
    let overridden = response_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/items/{}", item_id),
            Some(json!({
                "user_email": OWNER,
                "classification": { "type": "Hazardous", "notes": "Swollen battery pack" }
            })),
        )
        .await,
    )
    .await;
    assert_eq!(overridden["classification"]["type"], json!("Hazardous"));
    assert_eq!(
        overridden["classification"]["notes"],
        json!("Swollen battery pack")
    );
}

#[tokio::test]
async fn delete_is_owner_gated() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "Projector", "Projector", "Poor", 80).await;
    let item_id = item["id"].as_str().unwrap();

    let foreign = app
        .request(
            Method::DELETE,
            &format!("/api/v1/items/{}?owner={}", item_id, STRANGER),
            None,
        )
        .await;
    assert_eq!(foreign.status(), 404);

    let owned = app
        .request(
            Method::DELETE,
            &format!("/api/v1/items/{}?owner={}", item_id, OWNER),
            None,
        )
        .await;
    assert_eq!(owned.status(), 204);

    let gone = app
        .request(Method::GET, &format!("/api/v1/items/{}", item_id), None)
        .await;
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn listing_filters_by_owner_newest_first() {
    let app = TestApp::new().await;
    seed_item(&app, "First", "Other", "Poor", 10).await;
    seed_item(&app, "Second", "Other", "Poor", 10).await;

    let other_owner = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({
                "name": "Foreign item",
                "department": "Hostel",
                "category": "Other",
                "age_months": 1,
                "condition": "Good",
                "created_by": STRANGER
            })),
        )
        .await;
    assert_eq!(other_owner.status(), 201);

    let mine = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/items?owner={}", OWNER),
            None,
        )
        .await,
    )
    .await;
    let names: Vec<&str> = mine
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(!names.contains(&"Foreign item"));

    let everyone = response_json(app.request(Method::GET, "/api/v1/items", None).await).await;
    assert_eq!(everyone.as_array().unwrap().len(), 3);
}
