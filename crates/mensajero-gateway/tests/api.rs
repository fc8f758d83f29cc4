// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process API tests driving the router with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use mensajero_gateway::{AuthConfig, GatewayState, router};
use mensajero_test_utils::{TestHarness, shipment_csv};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(harness: &TestHarness) -> Router {
    let state = GatewayState {
        logistics: harness.logistics.clone(),
        auth: AuthConfig {
            bearer_token: harness.config.gateway.bearer_token.clone(),
        },
        service_name: harness.config.service.name.clone(),
    };
    router(state, harness.config.gateway.max_upload_bytes)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_is_public_and_ok() {
    let harness = TestHarness::builder()
        .with_bearer_token("s3cret")
        .build()
        .await
        .unwrap();
    let app = app(&harness);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "mensajero");
}

#[tokio::test]
async fn bearer_token_guards_v1_routes() {
    let harness = TestHarness::builder()
        .with_bearer_token("s3cret")
        .build()
        .await
        .unwrap();
    let app = app(&harness);

    let (status, _) = get_json(&app, "/v1/zones").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/v1/zones")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn registration_round_trip_and_conflicts() {
    let harness = TestHarness::builder().build().await.unwrap();
    let app = app(&harness);

    let (status, zone) = post_json(&app, "/v1/zones", json!({"name": "Norte", "tariff": 5000.0})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(zone["name"], "Norte");

    let (status, body) = post_json(&app, "/v1/zones", json!({"name": "Norte", "tariff": 1.0})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "duplicate_registration");

    let (status, body) = post_json(&app, "/v1/zones", json!({"name": "Sur", "tariff": -3.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");

    let (status, body) = post_json(&app, "/v1/couriers", json!({"name": "Ana", "zone": "Sur"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = post_json(&app, "/v1/couriers", json!({"name": "Ana", "zone": "Norte"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, couriers) = get_json(&app, "/v1/couriers").await;
    assert_eq!(couriers[0]["zone"], "Norte");
    assert_eq!(couriers[0]["tariff"], 5000.0);

    let (status, _) = post_json(&app, "/v1/customers", json!({"name": "Acme"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = post_json(&app, "/v1/customers", json!({"name": "ACME"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn import_reports_counts_and_schema_errors() {
    let harness = TestHarness::with_defaults(&["A100"]).await.unwrap();
    let app = app(&harness);

    let request = Request::builder()
        .method("POST")
        .uri("/v1/shipments/import?format=csv")
        .body(Body::from(shipment_csv(&["A100", "A200"])))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["inserted"], 1);
    assert_eq!(report["skipped"], 1);

    let request = Request::builder()
        .method("POST")
        .uri("/v1/shipments/import")
        .body(Body::from("sender,tracking_number\nTienda,A1\n"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["missing"], json!(["recipient", "address", "city"]));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/shipments/import?format=pdf")
        .body(Body::from("x"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_dispatch_reports_partial_success() {
    let harness = TestHarness::with_defaults(&["A100", "A101"]).await.unwrap();
    let app = app(&harness);

    let (status, _) = post_json(
        &app,
        "/v1/dispatches",
        json!({"courier": "Ana", "tracking_numbers": ["A101"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, report) = post_json(
        &app,
        "/v1/dispatches",
        json!({"courier": "Ana", "tracking_numbers": "A100, A101, A102"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["dispatched"].as_array().unwrap().len(), 1);
    assert_eq!(report["dispatched"][0]["tracking_number"], "A100");
    let failed = report["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0]["code"], "already_dispatched");
    assert_eq!(failed[1]["code"], "not_found");

    let (status, _) = post_json(
        &app,
        "/v1/dispatches",
        json!({"courier": "Nadie", "tracking_numbers": ["A100"]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reception_and_status_flow() {
    let harness = TestHarness::with_defaults(&["A100", "A101"]).await.unwrap();
    let app = app(&harness);

    let (status, body) = post_json(
        &app,
        "/v1/receptions",
        json!({"tracking_number": "A100", "outcome": "DELIVERED"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "not_yet_dispatched");

    post_json(
        &app,
        "/v1/dispatches",
        json!({"courier": "Ana", "tracking_numbers": ["A100"]}),
    )
    .await;
    let (status, reception) = post_json(
        &app,
        "/v1/receptions",
        json!({"tracking_number": "A100", "outcome": "returned", "reason": "damaged"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reception["outcome"], "RETURNED");

    let (status, shipment) = get_json(&app, "/v1/shipments/A100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shipment["state"], "RETURNED");
    assert_eq!(shipment["reason"], "damaged");
    assert_eq!(shipment["courier"], "Ana");

    let (status, missing) = get_json(&app, "/v1/shipments/ZZZ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(missing["state"], "MISSING");

    let (status, _) = post_json(
        &app,
        "/v1/receptions",
        json!({"tracking_number": "A101", "outcome": "lost"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pickups_are_logged_newest_first() {
    let harness = TestHarness::builder()
        .with_customer("Acme")
        .build()
        .await
        .unwrap();
    let app = app(&harness);

    let (status, _) = post_json(
        &app,
        "/v1/pickups",
        json!({"tracking_number": "P1", "date": "2024-03-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, pickup) = post_json(
        &app,
        "/v1/pickups",
        json!({"tracking_number": "P2", "date": "2024-03-02 10:00:00", "customer": "acme"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pickup["customer"], "Acme");

    let (_, pickups) = get_json(&app, "/v1/pickups").await;
    assert_eq!(pickups[0]["tracking_number"], "P2");
    assert_eq!(pickups[1]["tracking_number"], "P1");

    let (status, _) = post_json(
        &app,
        "/v1/pickups",
        json!({"tracking_number": "P3", "customer": "Nadie"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settlement_and_exports() {
    let harness = TestHarness::with_defaults(&["A100", "A101"]).await.unwrap();
    let app = app(&harness);
    post_json(
        &app,
        "/v1/dispatches",
        json!({"courier": "Ana", "tracking_numbers": ["A100", "A101"]}),
    )
    .await;

    let (status, settlement) =
        get_json(&app, "/v1/settlements?courier=Ana&from=2000-01-01&to=2999-12-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settlement["count"], 2);
    assert_eq!(settlement["total"], 10000.0);

    let (status, _) = get_json(&app, "/v1/settlements?courier=Ana&from=yesterday&to=2999-12-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .uri("/v1/exports/dispatches?format=csv&courier=Ana")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("dispatches.csv")
    );
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("tracking_number,courier,zone,dispatch_date\n"));
    assert_eq!(text.lines().count(), 3);

    let (status, _) = get_json(&app, "/v1/exports/payroll").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .uri("/v1/exports/shipments")
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"PK"));
}
