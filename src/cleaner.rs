use chrono::{DateTime, TimeDelta, Timelike, Utc};
use std::time::Duration;
use tokio::{sync::watch, time::sleep};
use tracing::{debug, error, info};

use crate::upload::TempStore;

/// Background task that empties the temp store at the top of every hour.
///
/// Owned by the server lifecycle: spawned on start, stopped through the
/// watch channel on graceful shutdown. A tick that fails to list the
/// directory is logged and skipped until the next tick; per-entry deletion
/// failures are swallowed.
pub struct Cleaner {
    store: TempStore,
    shutdown: watch::Receiver<bool>,
}

impl Cleaner {
    pub fn new(store: TempStore, shutdown: watch::Receiver<bool>) -> Self {
        Self { store, shutdown }
    }

    pub async fn run(mut self) {
        info!(dir = %self.store.dir().display(), "Temp cleanup task started");

        loop {
            let wait = until_next_tick(Utc::now());
            tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("Temp cleanup task shutting down");
                    break;
                }
                () = sleep(wait) => self.tick().await,
            }
        }
    }

    pub async fn tick(&self) {
        match self.store.sweep().await {
            Ok(report) => {
                debug!(removed = report.removed(), failed = report.failed(), "Temp directory swept");
            }
            Err(err) => error!("Temp cleanup error: {err}"),
        }
    }
}

/// Time remaining until the next minute-0 boundary. At an exact boundary
/// the next tick is a full hour away.
pub fn until_next_tick(now: DateTime<Utc>) -> Duration {
    let next = (now + TimeDelta::hours(1))
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now + TimeDelta::hours(1));

    (next - now)
        .to_std()
        .unwrap_or_else(|_| Duration::from_secs(3600))
}
