use axum::{Extension, Json, debug_handler, extract::State};

use crate::{auth::AuthContext, error::AppResult, model::User, state::AppState};

/// Everyone except the caller, newest first.
#[debug_handler]
#[utoipa::path(
    get,
    tag = "users",
    path = "/",
    responses((status = OK, body = [User]), (status = UNAUTHORIZED)),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> AppResult<Json<Vec<User>>> {
    let exclude = ctx.claims.as_ref().map(|claims| claims.sub.as_str());
    Ok(Json(state.repository.list_users(exclude).await?))
}
