#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use harmonia::{
    config::{AuthConfig, CorsConfig, FrontendConfig, RuntimeEnv, UploadConfig},
    model::{Album, AlbumDetail, NewAlbum, NewSong, Song, StatsSummary, User},
    repository::Repository,
    state::AppState,
    upload::TempStore,
};

pub const ADMIN_SUBJECT: &str = "admin-user";

/// In-memory stand-in for the database. `fail` makes every read return
/// the same error so error translation can be observed.
#[derive(Default)]
pub struct MockRepository {
    pub fail: bool,
}

impl MockRepository {
    fn check_failure(&self) -> Result<()> {
        if self.fail {
            Err(anyhow!("DB unreachable"))
        } else {
            Ok(())
        }
    }
}

pub fn sample_song(id: i64) -> Song {
    Song {
        id,
        title: format!("Song {id}"),
        artist: "Test Artist".to_string(),
        image_url: format!("tmp/song-{id}.jpg"),
        audio_url: format!("tmp/song-{id}.mp3"),
        duration: 180,
        album_id: None,
        created_at: Utc::now(),
    }
}

pub fn sample_album(id: i64) -> Album {
    Album {
        id,
        title: format!("Album {id}"),
        artist: "Test Artist".to_string(),
        image_url: format!("tmp/album-{id}.jpg"),
        release_year: 2024,
        created_at: Utc::now(),
    }
}

pub fn sample_user(id: i64, subject: &str) -> User {
    User {
        id,
        auth_subject: subject.to_string(),
        full_name: format!("User {id}"),
        image_url: String::new(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn health_check(&self) -> bool {
        !self.fail
    }

    async fn list_songs(&self) -> Result<Vec<Song>> {
        self.check_failure()?;
        Ok(vec![sample_song(1), sample_song(2)])
    }

    async fn random_songs(&self, limit: i64) -> Result<Vec<Song>> {
        self.check_failure()?;
        Ok((0..limit).map(sample_song).collect())
    }

    async fn create_song(&self, song: NewSong) -> Result<Song> {
        self.check_failure()?;
        Ok(Song {
            id: 100,
            title: song.title,
            artist: song.artist,
            image_url: song.image_url,
            audio_url: song.audio_url,
            duration: song.duration,
            album_id: song.album_id,
            created_at: Utc::now(),
        })
    }

    async fn delete_song(&self, id: i64) -> Result<bool> {
        self.check_failure()?;
        Ok(id < 1000)
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        self.check_failure()?;
        Ok(vec![sample_album(7)])
    }

    async fn album_with_songs(&self, id: i64) -> Result<Option<AlbumDetail>> {
        self.check_failure()?;
        if id >= 1000 {
            return Ok(None);
        }
        Ok(Some(AlbumDetail {
            album: sample_album(id),
            songs: vec![sample_song(1)],
        }))
    }

    async fn create_album(&self, album: NewAlbum) -> Result<Album> {
        self.check_failure()?;
        Ok(Album {
            id: 200,
            title: album.title,
            artist: album.artist,
            image_url: album.image_url,
            release_year: album.release_year,
            created_at: Utc::now(),
        })
    }

    async fn delete_album(&self, id: i64) -> Result<bool> {
        self.check_failure()?;
        Ok(id < 1000)
    }

    async fn list_users(&self, exclude_subject: Option<&str>) -> Result<Vec<User>> {
        self.check_failure()?;
        let users = vec![sample_user(1, "subject-1"), sample_user(2, "subject-2")];
        Ok(users
            .into_iter()
            .filter(|u| Some(u.auth_subject.as_str()) != exclude_subject)
            .collect())
    }

    async fn upsert_user(&self, subject: &str, full_name: &str, image_url: &str) -> Result<User> {
        self.check_failure()?;
        Ok(User {
            id: 1,
            auth_subject: subject.to_string(),
            full_name: full_name.to_string(),
            image_url: image_url.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn stats(&self) -> Result<StatsSummary> {
        self.check_failure()?;
        Ok(StatsSummary {
            total_songs: 2,
            total_albums: 1,
            total_users: 2,
            total_artists: 1,
        })
    }
}

pub fn test_state(env: RuntimeEnv, repository: Arc<dyn Repository>) -> AppState {
    let upload = UploadConfig::default();
    AppState {
        repository,
        env,
        auth: Some(AuthConfig {
            // Not a real key; verification always fails, which is exactly
            // what the unauthenticated-path tests need.
            public_key: "-----BEGIN PUBLIC KEY-----\ninvalid\n-----END PUBLIC KEY-----".to_string(),
            admin_subject: Some(ADMIN_SUBJECT.to_string()),
        }),
        temp_store: TempStore::new(&upload),
        upload,
        cors: CorsConfig::default(),
        frontend: FrontendConfig::default(),
    }
}

pub fn dev_state() -> AppState {
    test_state(RuntimeEnv::Development, Arc::new(MockRepository::default()))
}
