// libs/appointment-cell/tests/integration_test.rs
// Full-router tests: JWT middleware plus handlers, against a mocked data layer.

use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockPostgrestResponses, TestConfig, TestUser};

fn test_app(mock_server: &MockServer) -> (Router, Arc<AppConfig>) {
    let config = TestConfig::with_postgrest_url(&mock_server.uri()).to_arc();
    (appointment_routes(config.clone()), config)
}

fn booking_body(customer_id: &str, provider_id: Uuid) -> serde_json::Value {
    let starts = Utc::now() + Duration::days(7);
    json!({
        "customer_id": customer_id,
        "provider_id": provider_id,
        "starts_at": starts.to_rfc3339(),
        "ends_at": (starts + Duration::hours(1)).to_rfc3339(),
    })
}

#[tokio::test]
async fn booking_without_a_token_is_unauthorized() {
    let mock_server = MockServer::start().await;
    let (app, _) = test_app(&mock_server);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            booking_body(&Uuid::new_v4().to_string(), Uuid::new_v4()).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_with_a_bad_signature_is_unauthorized() {
    let mock_server = MockServer::start().await;
    let (app, _) = test_app(&mock_server);

    let customer = TestUser::customer("customer@example.com");
    let token = JwtTestUtils::create_invalid_signature_token(&customer);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(
            booking_body(&customer.id, Uuid::new_v4()).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_end_to_end_returns_created() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let provider_id = Uuid::new_v4();
    let customer = TestUser::customer("customer@example.com");
    let token = JwtTestUtils::create_test_token(&customer, &config.jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user_id": provider_id }
        ])))
        .mount(&mock_server)
        .await;

    let body = booking_body(&customer.id, provider_id);
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::appointment_row(
                &Uuid::new_v4().to_string(),
                &customer.id,
                &provider_id.to_string(),
                body["starts_at"].as_str().unwrap(),
                body["ends_at"].as_str().unwrap(),
                "pending",
            )
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let appointment: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(appointment["status"], "pending");
    assert_eq!(appointment["provider_id"], json!(provider_id));
}

#[tokio::test]
async fn overlap_surfaces_as_http_409() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let provider_id = Uuid::new_v4();
    let customer = TestUser::customer("customer@example.com");
    let token = JwtTestUtils::create_test_token(&customer, &config.jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user_id": provider_id }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(MockPostgrestResponses::exclusion_violation_body()),
        )
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(
            booking_body(&customer.id, provider_id).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn listing_returns_appointments_in_order() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let customer = TestUser::customer("customer@example.com");
    let token = JwtTestUtils::create_test_token(&customer, &config.jwt_secret, Some(24));

    let provider_id = Uuid::new_v4().to_string();
    let first_start = (Utc::now() + Duration::days(1)).to_rfc3339();
    let first_end = (Utc::now() + Duration::days(1) + Duration::hours(1)).to_rfc3339();
    let second_start = (Utc::now() + Duration::days(2)).to_rfc3339();
    let second_end = (Utc::now() + Duration::days(2) + Duration::hours(1)).to_rfc3339();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::appointment_row(
                &Uuid::new_v4().to_string(),
                &customer.id,
                &provider_id,
                &first_start,
                &first_end,
                "approved",
            ),
            MockPostgrestResponses::appointment_row(
                &Uuid::new_v4().to_string(),
                &customer.id,
                &provider_id,
                &second_start,
                &second_end,
                "pending",
            ),
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 2);
    assert!(
        appointments[0]["starts_at"].as_str().unwrap()
            < appointments[1]["starts_at"].as_str().unwrap()
    );
}
