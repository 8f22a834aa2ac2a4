use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};

use crate::{
    config::{AppSettings, AuthConfig, CorsConfig, FrontendConfig, RuntimeEnv, UploadConfig},
    repository::{PostgresRepository, Repository},
    upload::TempStore,
};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub env: RuntimeEnv,
    pub auth: Option<AuthConfig>,
    pub upload: UploadConfig,
    pub cors: CorsConfig,
    pub frontend: FrontendConfig,
    pub temp_store: TempStore,
}

/// Build app state over a lazily-connected Postgres pool. No connection is
/// attempted here; the first query opens one.
pub fn init_state_with_pg(config: &AppSettings) -> Result<AppState> {
    let mut options = PgPoolOptions::new();
    if let Some(max_connections) = config.database.max_connections {
        options = options.max_connections(max_connections);
    }
    if let Some(timeout) = config.database.connection_timeout_seconds {
        options = options.acquire_timeout(Duration::from_secs(timeout));
    }
    let pool = options.connect_lazy(&config.database.uri)?;

    Ok(AppState {
        repository: Arc::new(PostgresRepository { pool }),
        env: config.environment,
        auth: config.auth.clone(),
        upload: config.upload.clone(),
        cors: config.cors.clone(),
        frontend: config.frontend.clone(),
        temp_store: TempStore::new(&config.upload),
    })
}
