use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::board::columns::{parse_column_id, partition_by_status, ColumnCounts, StatusColumns};
use crate::board::drag::{resolve_drop, IgnoreReason};
use crate::errors::AppError;
use crate::jobs::handlers::UserIdQuery;
use crate::jobs::repo;
use crate::models::job::Job;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BoardResponse {
    pub columns: StatusColumns,
    pub counts: ColumnCounts,
}

#[derive(Deserialize)]
pub struct DropRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub target_column: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropResponse {
    Ignored { reason: IgnoreReason },
    Moved { job: Job },
}

/// GET /api/v1/board
pub async fn handle_get_board(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let jobs = repo::list_jobs(&state.db, params.user_id).await?;
    let columns = partition_by_status(&jobs);
    let counts = columns.counts();
    Ok(Json(BoardResponse { columns, counts }))
}

/// POST /api/v1/board/drop
///
/// Same drop rules as the client board: a target that is not a column, or the
/// column the job already sits in, is ignored without touching the database.
pub async fn handle_board_drop(
    State(state): State<AppState>,
    Json(req): Json<DropRequest>,
) -> Result<Json<DropResponse>, AppError> {
    if parse_column_id(&req.target_column).is_none() {
        debug!("Drop on '{}' ignored: not a column", req.target_column);
        return Ok(Json(DropResponse::Ignored {
            reason: IgnoreReason::InvalidTarget,
        }));
    }

    let job = repo::get_job(&state.db, req.user_id, req.job_id).await?;
    let target = match resolve_drop(job.status, &req.target_column) {
        Ok(target) => target,
        Err(reason) => return Ok(Json(DropResponse::Ignored { reason })),
    };

    let job = repo::update_job_status(&state.db, req.user_id, req.job_id, target).await?;
    state.feed.job_updated(&job);
    Ok(Json(DropResponse::Moved { job }))
}
