use axum::{Json, debug_handler, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, state::AppState};

/// Post-login callback payload from the identity provider's frontend SDK.
#[derive(ToSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCallbackRequest {
    /// Provider-assigned subject.
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(ToSchema, Serialize)]
pub struct AuthCallbackResponse {
    pub success: bool,
}

/// Mirror the signed-in user into our own users table. Idempotent; a repeat
/// callback refreshes name and avatar.
#[debug_handler]
#[utoipa::path(
    post,
    tag = "auth",
    path = "/callback",
    request_body = AuthCallbackRequest,
    responses((status = OK, body = AuthCallbackResponse))
)]
pub async fn auth_callback(
    State(state): State<AppState>,
    Json(request): Json<AuthCallbackRequest>,
) -> AppResult<Json<AuthCallbackResponse>> {
    let full_name = format!(
        "{} {}",
        request.first_name.unwrap_or_default(),
        request.last_name.unwrap_or_default()
    )
    .trim()
    .to_string();

    state
        .repository
        .upsert_user(
            &request.id,
            &full_name,
            request.image_url.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(AuthCallbackResponse { success: true }))
}
