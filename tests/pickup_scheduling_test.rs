//! Tests for pickup scheduling: the all-or-nothing multi-item transition,
//! vendor-facing listings, and the owner scheduling overview.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

const OWNER: &str = "amy@campus.edu";

async fn seed_vendor(app: &TestApp, name: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/vendors",
            Some(json!({ "name": name, "contact": "ops@vendor.example" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn seed_item(app: &TestApp, name: &str, owner: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({
                "name": name,
                "department": "Engineering",
                "category": "Computer",
                "age_months": 30,
                "condition": "Poor",
                "created_by": owner
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn fetch_item(app: &TestApp, item_id: &str) -> Value {
    response_json(
        app.request(Method::GET, &format!("/api/v1/items/{}", item_id), None)
            .await,
    )
    .await
}

#[tokio::test]
async fn creating_a_pickup_schedules_every_item() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;
    let a = seed_item(&app, "Tower A", OWNER).await;
    let b = seed_item(&app, "Tower B", OWNER).await;
    let c = seed_item(&app, "Tower C", OWNER).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": vendor_id,
                "item_ids": [a, b, c],
                "date": "2026-09-01",
                "notes": "Loading dock 3",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let pickup = response_json(response).await;
    let pickup_id = pickup["id"].as_str().unwrap();
    assert_eq!(pickup["item_ids"].as_array().unwrap().len(), 3);

    for item_id in [&a, &b, &c] {
        let item = fetch_item(&app, item_id).await;
        assert_eq!(item["status"], json!("Scheduled"), "item {}", item_id);
        assert_eq!(item["pickup_id"], json!(pickup_id));
        let trail = item["audit_trail"].as_array().unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0]["stage"], json!("Pickup scheduled"));
        assert_eq!(trail[0]["status"], json!("Scheduled"));
    }
}

#[tokio::test]
async fn pickup_with_a_missing_item_changes_nothing() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;
    let a = seed_item(&app, "Tower A", OWNER).await;
    let b = seed_item(&app, "Tower B", OWNER).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": vendor_id,
                "item_ids": [a, b, Uuid::new_v4()],
                "date": "2026-09-01",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(response.status(), 404);

    // All-or-nothing: the two real items are untouched
    for item_id in [&a, &b] {
        let item = fetch_item(&app, item_id).await;
        assert_eq!(item["status"], json!("Reported"));
        assert!(item["pickup_id"].is_null());
        assert_eq!(item["audit_trail"].as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn pickup_with_a_foreign_item_reads_as_not_found() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;
    let mine = seed_item(&app, "Tower A", OWNER).await;
    let foreign = seed_item(&app, "Foreign tower", "mallory@campus.edu").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": vendor_id,
                "item_ids": [mine, foreign],
                "date": "2026-09-01",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(response.status(), 404);

    let untouched = fetch_item(&app, &mine).await;
    assert_eq!(untouched["status"], json!("Reported"));
}

#[tokio::test]
async fn pickup_rejects_items_already_scheduled() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;
    let a = seed_item(&app, "Tower A", OWNER).await;

    let first = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": vendor_id,
                "item_ids": [a],
                "date": "2026-09-01",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(first.status(), 201);

    let second = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": vendor_id,
                "item_ids": [a],
                "date": "2026-09-08",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(second.status(), 400);
}

#[tokio::test]
async fn pickup_requires_items_and_a_known_vendor() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;

    let empty = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": vendor_id,
                "item_ids": [],
                "date": "2026-09-01",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(empty.status(), 400);

    let item = seed_item(&app, "Tower A", OWNER).await;
    let unknown_vendor = app
        .request(
            Method::POST,
            "/api/v1/pickups",
            Some(json!({
                "vendor_id": Uuid::new_v4(),
                "item_ids": [item],
                "date": "2026-09-01",
                "created_by": OWNER
            })),
        )
        .await;
    assert_eq!(unknown_vendor.status(), 404);
}

#[tokio::test]
async fn vendor_listing_resolves_item_names() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;
    let a = seed_item(&app, "Tower A", OWNER).await;
    let b = seed_item(&app, "Tower B", OWNER).await;

    app.request(
        Method::POST,
        "/api/v1/pickups",
        Some(json!({
            "vendor_id": vendor_id,
            "item_ids": [a, b],
            "date": "2026-09-01",
            "created_by": OWNER
        })),
    )
    .await;

    let missing_param = app.request(Method::GET, "/api/v1/pickups", None).await;
    assert_eq!(missing_param.status(), 400);

    let listed = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/pickups?vendor_id={}", vendor_id),
            None,
        )
        .await,
    )
    .await;
    let pickups = listed.as_array().unwrap();
    assert_eq!(pickups.len(), 1);
    let names: Vec<&str> = pickups[0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tower A", "Tower B"]);
}

#[tokio::test]
async fn scheduling_overview_reports_only_schedulable_items() {
    let app = TestApp::new().await;
    let vendor_id = seed_vendor(&app, "GreenCycle").await;
    let scheduled = seed_item(&app, "Scheduled tower", OWNER).await;
    let reported = seed_item(&app, "Reported tower", OWNER).await;

    app.request(
        Method::POST,
        "/api/v1/pickups",
        Some(json!({
            "vendor_id": vendor_id,
            "item_ids": [scheduled],
            "date": "2026-09-01",
            "created_by": OWNER
        })),
    )
    .await;

    let missing_param = app.request(Method::GET, "/api/v1/scheduling", None).await;
    assert_eq!(missing_param.status(), 400);

    let overview = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/scheduling?owner={}", OWNER),
            None,
        )
        .await,
    )
    .await;

    assert_eq!(overview["vendors"].as_array().unwrap().len(), 1);
    assert_eq!(overview["pickups"].as_array().unwrap().len(), 1);
    let schedulable: Vec<&str> = overview["schedulable_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(schedulable, vec![reported.as_str()]);
}
