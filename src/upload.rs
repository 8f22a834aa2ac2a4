use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::json;
use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;

use crate::{config::UploadConfig, state::AppState};

/// Filesystem directory holding transient uploaded files.
///
/// Every entry is disposable: the hourly sweep removes whatever it finds,
/// and a staged file that survives past the next sweep is incidental, never
/// relied upon. Uploads and sweeps may race; that is accepted.
#[derive(Debug, Clone)]
pub struct TempStore {
    dir: PathBuf,
    max_file_size: usize,
    create_parent_dirs: bool,
}

/// Why a payload could not be staged.
#[derive(Debug, Error)]
pub enum StageError {
    /// Payload exceeds the configured file cap. The header precheck is
    /// only a fast path; chunked bodies never declare a length, so the
    /// cap has to hold here too.
    #[error("File is too large")]
    TooLarge,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Per-entry outcomes of one sweep, so callers (and tests) can observe
/// partial failures instead of racing timers.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub entries: Vec<(PathBuf, io::Result<()>)>,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.removed()
    }
}

impl TempStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.temp_dir.clone(),
            max_file_size: config.max_file_size,
            create_parent_dirs: config.create_parent_dirs,
        }
    }

    /// Store rooted at an explicit directory with the default file cap,
    /// parents created on demand.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            dir,
            max_file_size: UploadConfig::default().max_file_size,
            create_parent_dirs: true,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an uploaded payload into the store, overwriting any entry of
    /// the same name. Payloads over the file cap are rejected before any
    /// disk mutation. Only the final file-name component of `file_name` is
    /// used, so a hostile path cannot escape the directory.
    pub async fn stage(&self, file_name: &str, data: Bytes) -> Result<PathBuf, StageError> {
        if data.len() > self.max_file_size {
            return Err(StageError::TooLarge);
        }

        if self.create_parent_dirs {
            fs::create_dir_all(&self.dir).await?;
        }

        let name = Path::new(file_name)
            .file_name()
            .unwrap_or_else(|| OsStr::new("upload.bin"));
        let path = self.dir.join(name);
        fs::write(&path, &data).await?;
        Ok(path)
    }

    /// Delete every direct entry of the store, best effort per entry.
    ///
    /// A missing directory is not an error and mutates nothing. A listing
    /// failure aborts the sweep. Individual deletions are attempted as
    /// plain files; a failing entry (a subdirectory, say) is recorded in
    /// the report and does not block the rest.
    pub async fn sweep(&self) -> io::Result<SweepReport> {
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(SweepReport::default());
        }

        let mut dir = fs::read_dir(&self.dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let outcome = fs::remove_file(&path).await;
            entries.push((path, outcome));
        }
        Ok(SweepReport { entries })
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

fn declared_length(request: &Request) -> Option<u64> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Rejects oversized file uploads before they reach the router, when the
/// request declares its length. Chunked bodies are caught later, at
/// [`TempStore::stage`].
pub async fn enforce_upload_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_multipart(&request) {
        if let Some(length) = declared_length(&request) {
            if length > state.upload.max_file_size as u64 {
                return (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({ "message": "File is too large" })),
                )
                    .into_response();
            }
        }
    }
    next.run(request).await
}
