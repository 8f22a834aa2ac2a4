mod admin_handlers;
mod album_handlers;
mod auth_handlers;
mod misc_handlers;
mod song_handlers;
mod stat_handlers;
mod user_handlers;

use crate::{
    auth::{attach_auth_context, require_admin, require_auth},
    error::translate_errors,
    middleware::apply_axum_middleware,
    model::{Album, AlbumDetail, Song, StatsSummary, User},
    state::AppState,
    upload::enforce_upload_limit,
};
use axum::{Json, Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower_http::services::{ServeDir, ServeFile};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};

/// Slack on top of the file cap for multipart boundaries and form fields.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User listing endpoints"),
        (name = "admin", description = "Catalog management endpoints"),
        (name = "auth", description = "Identity provider callback endpoints"),
        (name = "songs", description = "Song catalog endpoints"),
        (name = "albums", description = "Album catalog endpoints"),
        (name = "stats", description = "Aggregate statistics endpoints"),
    ),
    components(
        schemas(
            misc_handlers::Health,
            Song,
            Album,
            AlbumDetail,
            User,
            StatsSummary,
            auth_handlers::AuthCallbackRequest,
            auth_handlers::AuthCallbackResponse,
            admin_handlers::AdminCheckResponse,
            admin_handlers::MessageResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user_handlers::list_users))
        .route_layer(middleware::from_fn(require_auth))
}

fn admin_routes(state: AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admin_handlers::check_admin))
        .routes(routes!(admin_handlers::create_song))
        .routes(routes!(admin_handlers::delete_song))
        .routes(routes!(admin_handlers::create_album))
        .routes(routes!(admin_handlers::delete_album))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(auth_handlers::auth_callback))
}

fn song_routes(state: AppState) -> OpenApiRouter<AppState> {
    // The full listing is an admin view; the curated picks are public.
    let admin_only = OpenApiRouter::new()
        .routes(routes!(song_handlers::list_songs))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    OpenApiRouter::new()
        .routes(routes!(song_handlers::featured_songs))
        .routes(routes!(song_handlers::made_for_you_songs))
        .routes(routes!(song_handlers::trending_songs))
        .merge(admin_only)
}

fn album_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(album_handlers::list_albums))
        .routes(routes!(album_handlers::get_album))
}

fn stat_routes(state: AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(stat_handlers::get_stats))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

pub fn build_router(state: AppState) -> Router {
    let (api_routes, mut openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Health endpoints (no auth required)
        .routes(routes!(misc_handlers::ping))
        .routes(routes!(misc_handlers::health))
        // Six route groups, each owned by one handler module
        .nest("/users", user_routes())
        .nest("/admin", admin_routes(state.clone()))
        .nest("/auth", auth_routes())
        .nest("/songs", song_routes(state.clone()))
        .nest("/albums", album_routes())
        .nest("/stats", stat_routes(state.clone()))
        .split_for_parts();

    openapi.paths.paths = openapi
        .paths
        .paths
        .into_iter()
        .map(|(path, item)| (format!("/api{path}"), item))
        .collect::<utoipa::openapi::path::PathsMap<_, _>>();

    // Per-request order: CORS -> error translation -> auth context ->
    // upload guard -> routing (layers run outermost-first).
    let mut full_router = Router::new()
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/api/scalar", openapi.clone()))
        .route("/api/openapi.json", get(|| async move { Json(openapi) }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_upload_limit,
        ))
        .layer(DefaultBodyLimit::max(
            state.upload.max_file_size + MULTIPART_OVERHEAD,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            attach_auth_context,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            translate_errors,
        ))
        .with_state(state.clone());

    // In production any unmatched path falls through to the built frontend
    // bundle (single-page-application catch-all). The entry document must
    // come back 200, so `fallback`, not `not_found_service`.
    if state.env.is_production() {
        let dist = state.frontend.dist_dir.clone();
        let index = dist.join("index.html");
        full_router =
            full_router.fallback_service(ServeDir::new(dist).fallback(ServeFile::new(index)));
    }

    // Apply middleware
    apply_axum_middleware(full_router, &state.cors)
}
