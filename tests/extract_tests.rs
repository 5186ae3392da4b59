// tests/extract_tests.rs
//
// Requests that fail extraction still get the JSON error-list body.

mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use common::build_router;
use serde_json::Value;
use tower::ServiceExt;

async fn send(request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = build_router()
        .await
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, content_type, body)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_error_list(status: StatusCode, content_type: Option<String>, body: &Value) {
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let messages = body["errors"]["body"].as_array().expect("errors.body array");
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn missing_json_field_is_a_validation_error() {
    let (status, content_type, body) =
        send(json_request("POST", "/api/users", r#"{"user":{}}"#)).await;

    assert_error_list(status, content_type, &body);
    assert!(body["errors"]["body"][0].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let (status, content_type, body) =
        send(json_request("POST", "/api/users/login", r#"{"user":"#)).await;

    assert_error_list(status, content_type, &body);
}

#[tokio::test]
async fn missing_content_type_is_a_validation_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .body(Body::from(r#"{"user":{}}"#))
        .unwrap();

    let (status, content_type, body) = send(request).await;

    assert_error_list(status, content_type, &body);
}

#[tokio::test]
async fn non_numeric_query_parameter_is_a_validation_error() {
    let request = Request::builder()
        .uri("/api/articles?limit=abc")
        .body(Body::empty())
        .unwrap();

    let (status, content_type, body) = send(request).await;

    assert_error_list(status, content_type, &body);
}

#[tokio::test]
async fn non_numeric_path_segment_is_a_validation_error() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/articles/some-slug/comments/abc")
        .body(Body::empty())
        .unwrap();

    let (status, content_type, body) = send(request).await;

    assert_error_list(status, content_type, &body);
}

#[tokio::test]
async fn well_formed_request_passes_through_the_layers() {
    let request = Request::builder()
        .uri("/api/tags")
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"], serde_json::json!([]));
}
