// Temp store sweep semantics: missing directory is a no-op, a sweep empties
// the directory without removing it, failing entries do not block siblings,
// and the schedule lands on the next top-of-hour.

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tempfile::tempdir;

use harmonia::{
    cleaner::until_next_tick,
    config::UploadConfig,
    upload::{StageError, TempStore},
};

#[tokio::test]
async fn sweep_of_missing_directory_is_a_no_op() {
    let base = tempdir().unwrap();
    let missing = base.path().join("absent");

    let report = TempStore::with_dir(missing.clone()).sweep().await.unwrap();

    assert!(report.entries.is_empty());
    assert!(!missing.exists());
}

#[tokio::test]
async fn sweep_empties_the_directory_but_keeps_it() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.tmp"), b"a").unwrap();
    std::fs::write(dir.path().join("b.tmp"), b"b").unwrap();

    let store = TempStore::with_dir(dir.path().to_path_buf());
    let report = store.sweep().await.unwrap();

    assert_eq!(report.removed(), 2);
    assert_eq!(report.failed(), 0);
    assert!(!dir.path().join("a.tmp").exists());
    assert!(!dir.path().join("b.tmp").exists());
    assert!(dir.path().exists());
}

#[tokio::test]
async fn failing_entry_does_not_block_the_rest() {
    let dir = tempdir().unwrap();
    // A subdirectory cannot be removed as a plain file.
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("c.tmp"), b"c").unwrap();

    let store = TempStore::with_dir(dir.path().to_path_buf());
    let report = store.sweep().await.unwrap();

    assert_eq!(report.removed(), 1);
    assert_eq!(report.failed(), 1);
    assert!(!dir.path().join("c.tmp").exists());
    assert!(dir.path().join("nested").exists());
}

#[tokio::test]
async fn stage_creates_the_directory_and_overwrites() {
    let base = tempdir().unwrap();
    let store = TempStore::with_dir(base.path().join("uploads"));

    let path = store
        .stage("track.mp3", Bytes::from_static(b"first"))
        .await
        .unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"first");

    let path = store
        .stage("track.mp3", Bytes::from_static(b"second"))
        .await
        .unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"second");
}

#[tokio::test]
async fn stage_rejects_payloads_over_the_cap() {
    let base = tempdir().unwrap();
    let store = TempStore::new(&UploadConfig {
        temp_dir: base.path().join("uploads"),
        max_file_size: 16,
        create_parent_dirs: true,
    });

    let err = store
        .stage("big.mp3", Bytes::from(vec![0u8; 17]))
        .await
        .unwrap_err();

    assert!(matches!(err, StageError::TooLarge));
    // Rejection happens before any disk mutation.
    assert!(!base.path().join("uploads").exists());
}

#[tokio::test]
async fn stage_keeps_hostile_names_inside_the_store() {
    let base = tempdir().unwrap();
    let store = TempStore::with_dir(base.path().join("uploads"));

    let path = store
        .stage("../../escape.mp3", Bytes::from_static(b"x"))
        .await
        .unwrap();
    assert!(path.starts_with(base.path().join("uploads")));
    assert_eq!(path.file_name().unwrap(), "escape.mp3");
}

#[test]
fn next_tick_lands_on_the_next_hour_boundary() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 15, 30).unwrap();
    assert_eq!(until_next_tick(now), Duration::from_secs(44 * 60 + 30));
}

#[test]
fn next_tick_at_an_exact_boundary_is_a_full_hour_away() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
    assert_eq!(until_next_tick(now), Duration::from_secs(3600));
}
