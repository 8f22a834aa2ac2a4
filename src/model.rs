use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A track in the catalog. `audio_url`/`image_url` point at wherever the
/// media was persisted; this layer only ever sees them as opaque strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    /// Track length in seconds.
    pub duration: i32,
    pub album_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
    pub created_at: DateTime<Utc>,
}

/// An album together with its track listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    pub songs: Vec<Song>,
}

/// A user mirrored from the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    /// Token subject assigned by the identity provider.
    pub auth_subject: String,
    pub full_name: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_songs: i64,
    pub total_albums: i64,
    pub total_users: i64,
    pub total_artists: i64,
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    pub duration: i32,
    pub album_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
}
