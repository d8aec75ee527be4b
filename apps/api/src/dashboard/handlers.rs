use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::dashboard::metrics::{compute_metrics, JobMetrics};
use crate::dashboard::preferences::{load_preferences, save_preferences, Preferences};
use crate::errors::AppError;
use crate::jobs::handlers::UserIdQuery;
use crate::jobs::repo;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PreferencesUpdate {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub preferences: Preferences,
}

/// GET /api/v1/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobMetrics>, AppError> {
    let jobs = repo::list_jobs(&state.db, params.user_id).await?;
    Ok(Json(compute_metrics(&jobs, Utc::now().date_naive())))
}

/// GET /api/v1/preferences
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Preferences>, AppError> {
    Ok(Json(load_preferences(&state.db, params.user_id).await?))
}

/// PUT /api/v1/preferences
pub async fn handle_put_preferences(
    State(state): State<AppState>,
    Json(req): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, AppError> {
    Ok(Json(
        save_preferences(&state.db, req.user_id, req.preferences).await?,
    ))
}
