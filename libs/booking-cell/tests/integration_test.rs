use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use booking_cell::router::{schedule_routes, user_routes};
use shared_database::MemoryDocumentStore;
use shared_models::{ProviderSchedule, Slot, UserRecord};

const SLOT_10AM: &str = "2024-06-01T10:00:00";

async fn seeded_app() -> Router {
    let store = MemoryDocumentStore::new();
    store
        .seed_user(UserRecord {
            id: "u1".to_string(),
            name: "Test Patient".to_string(),
            email: None,
            phone: None,
            appointments: Vec::new(),
        })
        .await;
    store
        .seed_schedule(ProviderSchedule {
            provider_id: "p1".to_string(),
            availability: vec![Slot {
                start_datetime: SLOT_10AM.parse().unwrap(),
                is_booked: false,
            }],
        })
        .await
        .unwrap();

    let store = Arc::new(store);
    Router::new()
        .nest("/users", user_routes(Arc::clone(&store) as _))
        .nest("/provider-schedules", schedule_routes(store as _))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_user_returns_201_with_id() {
    let app = seeded_app().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/users",
            json!({"name": "New Patient", "email": "new@example.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn create_user_without_name_is_400() {
    let app = seeded_app().await;

    let response = app
        .oneshot(json_request(Method::POST, "/users", json!({"name": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_roundtrip() {
    let app = seeded_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/users/u1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["id"], "u1");
    assert_eq!(body["appointments"], json!([]));

    let missing = app.oneshot(get_request("/users/nobody")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_then_double_booking_conflicts() {
    let app = seeded_app().await;

    let booked = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1", "start_datetime": SLOT_10AM, "reason": "checkup"}),
        ))
        .await
        .unwrap();
    assert_eq!(booked.status(), StatusCode::OK);
    let body = response_json(booked).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["provider_id"], "p1");

    let retry = app
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1", "start_datetime": SLOT_10AM}),
        ))
        .await
        .unwrap();
    assert_eq!(retry.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_with_missing_fields_is_400() {
    let app = seeded_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1", "start_datetime": "June 1st at ten"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_unknown_targets_is_404() {
    let app = seeded_app().await;

    let unknown_user = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/nobody/appointment",
            json!({"provider_id": "p1", "start_datetime": SLOT_10AM}),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_user.status(), StatusCode::NOT_FOUND);

    let unknown_provider = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p2", "start_datetime": SLOT_10AM}),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_provider.status(), StatusCode::NOT_FOUND);

    let unknown_slot = app
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1", "start_datetime": "2024-06-01T09:15:00"}),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_slot.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_succeeds_once_then_404() {
    let app = seeded_app().await;

    let booked = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1", "start_datetime": SLOT_10AM}),
        ))
        .await
        .unwrap();
    let body = response_json(booked).await;
    let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

    let cancel_uri = format!("/users/u1/appointment/{}", appointment_id);
    let cancelled = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(&cancel_uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status(), StatusCode::OK);

    let again = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(&cancel_uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schedule_view_reflects_bookings() {
    let app = seeded_app().await;

    let before = app
        .clone()
        .oneshot(get_request("/provider-schedules/p1"))
        .await
        .unwrap();
    assert_eq!(before.status(), StatusCode::OK);
    let body = response_json(before).await;
    assert_eq!(body["availability"][0]["is_booked"], json!(false));

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/users/u1/appointment",
            json!({"provider_id": "p1", "start_datetime": SLOT_10AM}),
        ))
        .await
        .unwrap();

    let after = app
        .clone()
        .oneshot(get_request("/provider-schedules/p1"))
        .await
        .unwrap();
    let body = response_json(after).await;
    assert_eq!(body["availability"][0]["is_booked"], json!(true));

    let missing = app
        .oneshot(get_request("/provider-schedules/p9"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
