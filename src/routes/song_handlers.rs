use axum::{Json, debug_handler, extract::State};

use crate::{error::AppResult, model::Song, state::AppState};

const FEATURED_COUNT: i64 = 6;
const MADE_FOR_YOU_COUNT: i64 = 4;
const TRENDING_COUNT: i64 = 4;

/// Full catalog listing for the admin dashboard.
#[debug_handler]
#[utoipa::path(
    get,
    tag = "songs",
    path = "/",
    responses((status = OK, body = [Song]), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn list_songs(State(state): State<AppState>) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(state.repository.list_songs().await?))
}

/// Random picks for the home page hero section.
#[debug_handler]
#[utoipa::path(get, tag = "songs", path = "/featured", responses((status = OK, body = [Song])))]
pub async fn featured_songs(State(state): State<AppState>) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(state.repository.random_songs(FEATURED_COUNT).await?))
}

#[debug_handler]
#[utoipa::path(get, tag = "songs", path = "/made-for-you", responses((status = OK, body = [Song])))]
pub async fn made_for_you_songs(State(state): State<AppState>) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(
        state.repository.random_songs(MADE_FOR_YOU_COUNT).await?,
    ))
}

#[debug_handler]
#[utoipa::path(get, tag = "songs", path = "/trending", responses((status = OK, body = [Song])))]
pub async fn trending_songs(State(state): State<AppState>) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(state.repository.random_songs(TRENDING_COUNT).await?))
}
