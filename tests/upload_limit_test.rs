// Oversized multipart requests are rejected before routing; everything
// under the cap passes through to whatever guard or handler owns the route.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use harmonia::routes::build_router;

fn multipart_request(declared_length: usize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/admin/songs")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=cut-here",
        )
        .header(header::CONTENT_LENGTH, declared_length.to_string())
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_any_handler() {
    let router = build_router(common::dev_state());
    let response = router
        .oneshot(multipart_request(11 * 1024 * 1024))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], json!("File is too large"));
}

#[tokio::test]
async fn oversized_upload_with_credentials_is_still_rejected() {
    let router = build_router(common::dev_state());
    let mut request = multipart_request(11 * 1024 * 1024);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer not-a-real-token".parse().unwrap(),
    );

    // The auth context layer runs first and never rejects; the size check
    // answers regardless of what the Authorization header holds.
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn upload_under_the_cap_reaches_the_router() {
    let router = build_router(common::dev_state());
    let response = router.oneshot(multipart_request(1024)).await.unwrap();

    // Small enough to route; the admin guard answers, not the upload layer.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_multipart_requests_ignore_the_file_cap() {
    let router = build_router(common::dev_state());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/songs/featured")
                .header(header::CONTENT_LENGTH, "0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
