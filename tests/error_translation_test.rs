// The central error translation layer: internal errors always surface as a
// server-error status, with the raw message in development and the fixed
// generic message in production.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use common::MockRepository;
use harmonia::{config::RuntimeEnv, routes::build_router};

async fn failing_request(env: RuntimeEnv) -> (StatusCode, Value) {
    let state = common::test_state(env, Arc::new(MockRepository { fail: true }));
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/songs/featured")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn development_mode_shows_the_error_message_verbatim() {
    let (status, body) = failing_request(RuntimeEnv::Development).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("DB unreachable"));
}

#[tokio::test]
async fn production_mode_shows_only_the_generic_message() {
    let (status, body) = failing_request(RuntimeEnv::Production).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("Internal server error"));
}
