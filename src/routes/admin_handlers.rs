use anyhow::anyhow;
use axum::{
    Json, debug_handler,
    extract::{Multipart, Path, State},
};
use serde::Serialize;
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    model::{Album, NewAlbum, NewSong, Song},
    state::AppState,
};

#[derive(ToSchema, Serialize)]
pub struct AdminCheckResponse {
    pub admin: bool,
}

#[derive(ToSchema, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn missing_field(name: &str) -> AppError {
    AppError::BadRequest(anyhow!("missing field: {name}"))
}

/// Reaching this handler at all means the admin guard let the caller in.
#[debug_handler]
#[utoipa::path(
    get,
    tag = "admin",
    path = "/check",
    responses((status = OK, body = AdminCheckResponse), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn check_admin() -> Json<AdminCheckResponse> {
    Json(AdminCheckResponse { admin: true })
}

/// Create a song from a multipart form: `title`, `artist`, `duration`,
/// optional `albumId`, plus `audioFile` and `imageFile` payloads staged
/// through the temp store.
#[debug_handler]
#[utoipa::path(
    post,
    tag = "admin",
    path = "/songs",
    responses((status = OK, body = Song), (status = BAD_REQUEST), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn create_song(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Song>> {
    let mut title = None;
    let mut artist = None;
    let mut duration = None;
    let mut album_id = None;
    let mut audio_path: Option<PathBuf> = None;
    let mut image_path: Option<PathBuf> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "title" => title = Some(field.text().await?),
            "artist" => artist = Some(field.text().await?),
            "duration" => {
                duration = Some(
                    field
                        .text()
                        .await?
                        .parse::<i32>()
                        .map_err(|_| AppError::BadRequest(anyhow!("duration must be an integer")))?,
                );
            }
            "albumId" => album_id = field.text().await?.parse::<i64>().ok(),
            "audioFile" => {
                let file_name = field.file_name().unwrap_or("audio").to_string();
                let data = field.bytes().await?;
                audio_path = Some(state.temp_store.stage(&file_name, data).await?);
            }
            "imageFile" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let data = field.bytes().await?;
                image_path = Some(state.temp_store.stage(&file_name, data).await?);
            }
            _ => {}
        }
    }

    let song = NewSong {
        title: title.ok_or_else(|| missing_field("title"))?,
        artist: artist.ok_or_else(|| missing_field("artist"))?,
        duration: duration.ok_or_else(|| missing_field("duration"))?,
        album_id,
        audio_url: audio_path
            .ok_or_else(|| missing_field("audioFile"))?
            .display()
            .to_string(),
        image_url: image_path
            .ok_or_else(|| missing_field("imageFile"))?
            .display()
            .to_string(),
    };

    let created = state.repository.create_song(song).await?;
    Ok(Json(created))
}

#[debug_handler]
#[utoipa::path(
    delete,
    tag = "admin",
    path = "/songs/{id}",
    params(("id" = i64, Path, description = "Song id")),
    responses((status = OK, body = MessageResponse), (status = NOT_FOUND), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !state.repository.delete_song(id).await? {
        return Err(AppError::NotFound(format!("Song {id}")));
    }
    Ok(Json(MessageResponse {
        message: "Song deleted successfully".to_string(),
    }))
}

/// Create an album from a multipart form: `title`, `artist`, `releaseYear`
/// and an `imageFile` payload staged through the temp store.
#[debug_handler]
#[utoipa::path(
    post,
    tag = "admin",
    path = "/albums",
    responses((status = OK, body = Album), (status = BAD_REQUEST), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn create_album(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Album>> {
    let mut title = None;
    let mut artist = None;
    let mut release_year = None;
    let mut image_path: Option<PathBuf> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "title" => title = Some(field.text().await?),
            "artist" => artist = Some(field.text().await?),
            "releaseYear" => {
                release_year = Some(field.text().await?.parse::<i32>().map_err(|_| {
                    AppError::BadRequest(anyhow!("releaseYear must be an integer"))
                })?);
            }
            "imageFile" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let data = field.bytes().await?;
                image_path = Some(state.temp_store.stage(&file_name, data).await?);
            }
            _ => {}
        }
    }

    let album = NewAlbum {
        title: title.ok_or_else(|| missing_field("title"))?,
        artist: artist.ok_or_else(|| missing_field("artist"))?,
        release_year: release_year.ok_or_else(|| missing_field("releaseYear"))?,
        image_url: image_path
            .ok_or_else(|| missing_field("imageFile"))?
            .display()
            .to_string(),
    };

    let created = state.repository.create_album(album).await?;
    Ok(Json(created))
}

#[debug_handler]
#[utoipa::path(
    delete,
    tag = "admin",
    path = "/albums/{id}",
    params(("id" = i64, Path, description = "Album id")),
    responses((status = OK, body = MessageResponse), (status = NOT_FOUND), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !state.repository.delete_album(id).await? {
        return Err(AppError::NotFound(format!("Album {id}")));
    }
    Ok(Json(MessageResponse {
        message: "Album deleted successfully".to_string(),
    }))
}
