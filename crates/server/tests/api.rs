use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::build_router;
use server::state::ServerState;

fn app(db: DatabaseConnection) -> Router {
    let state = ServerState { db, frontend_base_url: "http://localhost:8080".into() };
    build_router(CorsLayer::very_permissive(), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = match body {
        Some(v) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

/// Handlers that validate before touching storage must answer without a
/// live database.
#[tokio::test]
async fn health_and_input_validation_without_database() {
    let app = app(DatabaseConnection::Disconnected);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "POST", "/api/customers", Some(json!({ "name": "Ana" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("phone"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/pending-services",
        Some(json!({ "vehicle_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // empty update body is rejected before any query runs
    let (status, body) = send(&app, "PUT", "/api/customers/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields to update");

    // unknown status literal in the path
    let (status, _) = send(&app, "GET", "/api/pending-services/status/finished", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn test_app() -> Option<Router> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(_) => return None,
    };
    if migration::Migrator::up(&db, None).await.is_err() {
        return None;
    }
    Some(app(db))
}

#[tokio::test]
async fn full_workflow_over_http() {
    let Some(app) = test_app().await else { return };

    let (status, customer) = send(
        &app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "Ines Vidal", "phone": "555-0177" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = customer["id"].as_i64().unwrap();

    let (status, vehicle) = send(
        &app,
        "POST",
        "/api/vehicles",
        Some(json!({
            "customer_id": customer_id,
            "make": "Seat",
            "model": "Ibiza",
            "year": 2017,
            "license_plate": "IVD-204"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let vehicle_id = vehicle["id"].as_i64().unwrap();

    let (status, offer) = send(
        &app,
        "POST",
        "/api/services",
        Some(json!({ "name": "Full wash", "base_price": 30.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let offer_id = offer["id"].as_i64().unwrap();

    let (status, pending) = send(
        &app,
        "POST",
        "/api/pending-services",
        Some(json!({ "vehicle_id": vehicle_id, "service_type_id": offer_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pending["status"], "pending");
    assert_eq!(pending["client_name"], "Ines Vidal");
    let service_id = pending["id"].as_i64().unwrap();

    // completing returns the rating link and a public url
    let (status, done) =
        send(&app, "PATCH", &format!("/api/pending-services/{service_id}/complete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["service"]["status"], "completed");
    let token = done["ratingLink"].as_str().unwrap().to_string();
    assert!(done["ratingUrl"].as_str().unwrap().ends_with(&token));

    let (status, validated) =
        send(&app, "GET", &format!("/api/service-rating-links/validate/{token}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(validated["serviceId"].as_i64(), Some(service_id));
    assert_eq!(validated["vehicleMake"], "Seat");
    assert_eq!(validated["licensePlate"], "IVD-204");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/service-ratings/{service_id}"),
        Some(json!({
            "wait_time_rating": 5,
            "staff_friendliness_rating": 4,
            "service_quality_rating": 5,
            "token": token
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // the token was single-use; a burned token looks like a missing one
    let (status, _) =
        send(&app, "GET", &format!("/api/service-rating-links/validate/{token}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // so does a token that never existed
    let (status, _) =
        send(&app, "GET", "/api/service-rating-links/validate/0000never0000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, report) = send(&app, "GET", "/api/service-ratings/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(report["total_ratings"].as_i64().unwrap() >= 1);

    let (status, stats) = send(&app, "GET", "/api/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats["pendingVehicles"].is_i64());

    let (status, reports) = send(&app, "GET", "/api/reports", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(reports["summaryStats"]["totalServices"].is_i64());

    // cleanup; vehicle and pending service cascade from the customer, and
    // only then can the referenced offer go
    let (status, _) = send(&app, "DELETE", &format!("/api/customers/{customer_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/services/{offer_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/customers/{customer_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inventory_stock_guard_over_http() {
    let Some(app) = test_app().await else { return };

    let (status, item) = send(
        &app,
        "POST",
        "/api/inventory",
        Some(json!({
            "name": "Wax",
            "category": "Consumables",
            "quantity": 2,
            "unit": "cans",
            "cost_price": 4.0,
            "selling_price": 9.0,
            "reorder_level": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/inventory/usage",
        Some(json!({ "item_id": item_id, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // asking for more than remains reports the current count
    let (status, body) = send(
        &app,
        "POST",
        "/api/inventory/usage",
        Some(json!({ "item_id": item_id, "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["currentStock"], 1);

    let (status, low) = send(&app, "GET", "/api/inventory/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(low.as_array().unwrap().iter().any(|i| i["id"].as_i64() == Some(item_id)));

    let (status, adjusted) = send(
        &app,
        "PATCH",
        &format!("/api/inventory/{item_id}/quantity"),
        Some(json!({ "adjustment": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(adjusted["quantity"], 11);

    let (status, _) = send(&app, "DELETE", &format!("/api/inventory/{item_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
