use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::model::{Album, AlbumDetail, NewAlbum, NewSong, Song, StatsSummary, User};

/// Persistence seam for the six route groups. Concurrency control is the
/// pool's problem, not ours.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn health_check(&self) -> bool;

    async fn list_songs(&self) -> Result<Vec<Song>>;
    async fn random_songs(&self, limit: i64) -> Result<Vec<Song>>;
    async fn create_song(&self, song: NewSong) -> Result<Song>;
    async fn delete_song(&self, id: i64) -> Result<bool>;

    async fn list_albums(&self) -> Result<Vec<Album>>;
    async fn album_with_songs(&self, id: i64) -> Result<Option<AlbumDetail>>;
    async fn create_album(&self, album: NewAlbum) -> Result<Album>;
    async fn delete_album(&self, id: i64) -> Result<bool>;

    async fn list_users(&self, exclude_subject: Option<&str>) -> Result<Vec<User>>;
    async fn upsert_user(&self, subject: &str, full_name: &str, image_url: &str) -> Result<User>;

    async fn stats(&self) -> Result<StatsSummary>;
}

const SONG_COLUMNS: &str = "id, title, artist, image_url, audio_url, duration, album_id, created_at";
const ALBUM_COLUMNS: &str = "id, title, artist, image_url, release_year, created_at";
const USER_COLUMNS: &str = "id, auth_subject, full_name, image_url, created_at";

#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pub pool: Pool<Postgres>,
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn list_songs(&self) -> Result<Vec<Song>> {
        let songs = sqlx::query_as::<_, Song>(&format!(
            "SELECT {SONG_COLUMNS} FROM songs ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(songs)
    }

    async fn random_songs(&self, limit: i64) -> Result<Vec<Song>> {
        let songs = sqlx::query_as::<_, Song>(&format!(
            "SELECT {SONG_COLUMNS} FROM songs ORDER BY random() LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(songs)
    }

    async fn create_song(&self, song: NewSong) -> Result<Song> {
        let created = sqlx::query_as::<_, Song>(&format!(
            "INSERT INTO songs (title, artist, image_url, audio_url, duration, album_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SONG_COLUMNS}"
        ))
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.image_url)
        .bind(&song.audio_url)
        .bind(song.duration)
        .bind(song.album_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn delete_song(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        let albums = sqlx::query_as::<_, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(albums)
    }

    async fn album_with_songs(&self, id: i64) -> Result<Option<AlbumDetail>> {
        let album = sqlx::query_as::<_, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(album) = album else { return Ok(None) };

        let songs = sqlx::query_as::<_, Song>(&format!(
            "SELECT {SONG_COLUMNS} FROM songs WHERE album_id = $1 ORDER BY created_at"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(AlbumDetail { album, songs }))
    }

    async fn create_album(&self, album: NewAlbum) -> Result<Album> {
        let created = sqlx::query_as::<_, Album>(&format!(
            "INSERT INTO albums (title, artist, image_url, release_year) \
             VALUES ($1, $2, $3, $4) RETURNING {ALBUM_COLUMNS}"
        ))
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.image_url)
        .bind(album.release_year)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn delete_album(&self, id: i64) -> Result<bool> {
        // An album takes its track listing with it.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM songs WHERE album_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self, exclude_subject: Option<&str>) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE $1::text IS NULL OR auth_subject <> $1 \
             ORDER BY created_at DESC"
        ))
        .bind(exclude_subject)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn upsert_user(&self, subject: &str, full_name: &str, image_url: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (auth_subject, full_name, image_url) VALUES ($1, $2, $3) \
             ON CONFLICT (auth_subject) DO UPDATE \
             SET full_name = EXCLUDED.full_name, image_url = EXCLUDED.image_url \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(subject)
        .bind(full_name)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn stats(&self) -> Result<StatsSummary> {
        let summary = sqlx::query_as::<_, StatsSummary>(
            "SELECT \
               (SELECT COUNT(*) FROM songs) AS total_songs, \
               (SELECT COUNT(*) FROM albums) AS total_albums, \
               (SELECT COUNT(*) FROM users) AS total_users, \
               (SELECT COUNT(*) FROM \
                 (SELECT artist FROM songs UNION SELECT artist FROM albums) AS artists \
               ) AS total_artists",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}
