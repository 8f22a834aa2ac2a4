use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::RequestBodyTimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::CorsConfig;

pub fn apply_axum_middleware(router: Router, cors: &CorsConfig) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors))
            .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(10)))
            .layer(CompressionLayer::new()),
    )
}

/// Credentialed CORS for the configured frontend origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match config.origin.parse::<HeaderValue>() {
        Ok(origin) => layer = layer.allow_origin(origin),
        Err(_) => warn!(origin = %config.origin, "Invalid CORS origin, skipping allow-origin"),
    }
    layer
}
