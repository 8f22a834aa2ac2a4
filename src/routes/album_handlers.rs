use axum::{
    Json, debug_handler,
    extract::{Path, State},
};

use crate::{
    error::{AppError, AppResult},
    model::{Album, AlbumDetail},
    state::AppState,
};

#[debug_handler]
#[utoipa::path(get, tag = "albums", path = "/", responses((status = OK, body = [Album])))]
pub async fn list_albums(State(state): State<AppState>) -> AppResult<Json<Vec<Album>>> {
    Ok(Json(state.repository.list_albums().await?))
}

/// One album with its track listing.
#[debug_handler]
#[utoipa::path(
    get,
    tag = "albums",
    path = "/{id}",
    params(("id" = i64, Path, description = "Album id")),
    responses((status = OK, body = AlbumDetail), (status = NOT_FOUND))
)]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AlbumDetail>> {
    let detail = state
        .repository
        .album_with_songs(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Album {id}")))?;
    Ok(Json(detail))
}
