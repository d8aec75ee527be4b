use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::filters::{JobFilter, JobListQuery};
use crate::jobs::repo;
use crate::jobs::validation::{parse_status, validate_job_input, JobInput};
use crate::models::job::Job;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub user_id: Uuid,
    pub status: String,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let filter = JobFilter::from_query(&params)?;
    let jobs = repo::list_jobs(&state.db, params.user_id).await?;
    Ok(Json(filter.apply(jobs)))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<JobInput>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let new_job = validate_job_input(&req, Utc::now().date_naive())?;
    let job = repo::insert_job(&state.db, req.user_id, &new_job).await?;
    state.feed.job_inserted(&job);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(repo::get_job(&state.db, params.user_id, id).await?))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobInput>,
) -> Result<Json<Job>, AppError> {
    let new_job = validate_job_input(&req, Utc::now().date_naive())?;
    let job = repo::update_job(&state.db, req.user_id, id, &new_job).await?;
    state.feed.job_updated(&job);
    Ok(Json(job))
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<Job>, AppError> {
    let status = parse_status(&req.status)?;
    let job = repo::update_job_status(&state.db, req.user_id, id, status).await?;
    state.feed.job_updated(&job);
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let job = repo::delete_job(&state.db, params.user_id, id).await?;
    state.feed.job_deleted(&job);
    Ok(StatusCode::NO_CONTENT)
}
