use axum::{Json, debug_handler, extract::State};

use crate::{error::AppResult, model::StatsSummary, state::AppState};

/// Aggregate catalog counts for the admin dashboard.
#[debug_handler]
#[utoipa::path(
    get,
    tag = "stats",
    path = "/",
    responses((status = OK, body = StatsSummary), (status = UNAUTHORIZED), (status = FORBIDDEN)),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsSummary>> {
    Ok(Json(state.repository.stats().await?))
}
