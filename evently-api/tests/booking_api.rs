use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use evently_api::{app, AppState};
use evently_core::{Booking, BookingError, BookingPatch, BookingRepository, BookingResult, NewBooking};
use evently_store::InMemoryBookingRepository;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, InMemoryBookingRepository) {
    let repo = InMemoryBookingRepository::new();
    let router = app(AppState::new(Arc::new(repo.clone())));
    (router, repo)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn create(router: &Router, name: &str, email: &str, event: &str) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/bookings",
        Some(json!({ "name": name, "email": email, "event": event })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let (router, _) = test_app();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/bookings",
        Some(json!({ "name": "Ana", "email": "ana@x.com", "event": "Synergia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(body["data"].get("ticketType").is_none());

    let (status, body) = send(&router, Method::GET, &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["email"], "ana@x.com");
    assert_eq!(body["data"]["event"], "Synergia");

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/api/bookings/{id}"),
        Some(json!({ "ticketType": "VIP" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ticketType"], "VIP");
    assert_eq!(body["data"]["name"], "Ana");

    let (status, body) = send(&router, Method::DELETE, &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["ticketType"], "VIP");

    let (status, body) = send(&router, Method::GET, &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_create_missing_field_is_rejected_and_not_persisted() {
    let (router, repo) = test_app();

    for body in [
        json!({ "email": "ana@x.com", "event": "Synergia" }),
        json!({ "name": "Ana", "event": "Synergia" }),
        json!({ "name": "Ana", "email": "ana@x.com", "event": "" }),
    ] {
        let (status, body) = send(&router, Method::POST, "/api/bookings", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Missing required field"));
    }

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (router, repo) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_list_returns_count_and_data() {
    let (router, _) = test_app();

    let (status, body) = send(&router, Method::GET, "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));

    create(&router, "Ana", "ana@x.com", "Synergia").await;
    create(&router, "Bo", "bo@y.org", "RustConf").await;

    let (_, body) = send(&router, Method::GET, "/api/bookings", None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "Ana");
    assert_eq!(body["data"][1]["name"], "Bo");
}

#[tokio::test]
async fn test_empty_update_leaves_record_unchanged() {
    let (router, _) = test_app();
    let id = create(&router, "Ana", "ana@x.com", "Synergia").await;

    let (_, before) = send(&router, Method::GET, &format!("/api/bookings/{id}"), None).await;
    let (status, after) = send(
        &router,
        Method::PUT,
        &format!("/api/bookings/{id}"),
        Some(json!({ "name": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["data"], before["data"]);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let (router, _) = test_app();
    let unknown = Uuid::new_v4();

    for method in [Method::GET, Method::DELETE] {
        let (status, _) = send(&router, method, &format!("/api/bookings/{unknown}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/api/bookings/{unknown}"),
        Some(json!({ "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&router, method, "/api/bookings/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid booking id");
    }
}

#[tokio::test]
async fn test_delete_twice() {
    let (router, _) = test_app();
    let id = create(&router, "Ana", "ana@x.com", "Synergia").await;
    let uri = format!("/api/bookings/{id}");

    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_by_email_is_case_insensitive_substring() {
    let (router, _) = test_app();
    create(&router, "Ana", "Ana@Example.com", "Synergia").await;
    create(&router, "Bo", "bo@example.COM", "RustConf").await;
    create(&router, "Cy", "cy@other.org", "Synergia").await;

    let (status, body) = send(&router, Method::GET, "/api/bookings/search?email=EXAMPLE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&router, Method::GET, "/api/bookings/search?email=nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);

    let (status, body) = send(&router, Method::GET, "/api/bookings/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_filter_by_event_is_case_insensitive_substring() {
    let (router, _) = test_app();
    create(&router, "Ana", "ana@x.com", "Synergia 2024").await;
    create(&router, "Bo", "bo@x.com", "RustConf").await;

    let (status, body) = send(&router, Method::GET, "/api/bookings/filter?event=synERGIA", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Ana");

    let (status, _) = send(&router, Method::GET, "/api/bookings/filter?event=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filter_matches_leading_space_exactly() {
    let (router, _) = test_app();
    create(&router, "Ana", "ana@x.com", "Synergia2024").await;
    create(&router, "Bo", "bo@x.com", "Synergia 2024").await;

    let (status, body) = send(&router, Method::GET, "/api/bookings/filter?event=%202024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["event"], "Synergia 2024");

    let (status, _) = send(&router, Method::GET, "/api/bookings/filter?event=%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undecodable_id_is_enveloped_bad_request() {
    let (router, _) = test_app();

    let (status, body) = send(&router, Method::GET, "/api/bookings/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid booking id");

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/bookings/%20{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid booking id");
}

#[tokio::test]
async fn test_unsupported_method_is_enveloped() {
    let (router, _) = test_app();

    for uri in ["/api/bookings", "/api/bookings/search", "/health"] {
        let (status, body) = send(&router, Method::PATCH, uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let (router, _) = test_app();

    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&router, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

/// Store whose connection is gone or whose queries fail.
struct BrokenStore {
    reachable: bool,
}

#[async_trait]
impl BookingRepository for BrokenStore {
    async fn list_all(&self) -> BookingResult<Vec<Booking>> {
        Err(BookingError::persistence("relation \"bookings\" does not exist"))
    }

    async fn create(&self, _booking: NewBooking) -> BookingResult<Booking> {
        Err(BookingError::persistence("insert failed"))
    }

    async fn get_by_id(&self, _id: &str) -> BookingResult<Option<Booking>> {
        Err(BookingError::persistence("select failed"))
    }

    async fn update(&self, _id: &str, _patch: BookingPatch) -> BookingResult<Booking> {
        Err(BookingError::persistence("update failed"))
    }

    async fn delete(&self, _id: &str) -> BookingResult<Booking> {
        Err(BookingError::persistence("delete failed"))
    }

    async fn find_by_email_contains(&self, _needle: &str) -> BookingResult<Vec<Booking>> {
        Err(BookingError::persistence("select failed"))
    }

    async fn find_by_event_contains(&self, _needle: &str) -> BookingResult<Vec<Booking>> {
        Err(BookingError::persistence("select failed"))
    }

    async fn ping(&self) -> BookingResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(BookingError::persistence("connection refused"))
        }
    }
}

#[tokio::test]
async fn test_unreachable_store_reports_connection_failure() {
    let router = app(AppState::new(Arc::new(BrokenStore { reachable: false })));

    let (status, body) = send(&router, Method::GET, "/api/bookings", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Database connection failed");

    // Health does not touch the store.
    let (status, _) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_query_failure_surfaces_message() {
    let router = app(AppState::new(Arc::new(BrokenStore { reachable: true })));

    let (status, body) = send(&router, Method::GET, "/api/bookings", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "relation \"bookings\" does not exist");
    assert_ne!(body["message"], "Database connection failed");

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/bookings",
        Some(json!({ "name": "Ana", "email": "ana@x.com", "event": "Synergia" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
