pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::board::handlers as board;
use crate::dashboard::handlers as dashboard;
use crate::documents::handlers as documents;
use crate::documents::storage::MAX_UPLOAD_BYTES;
use crate::jobs::handlers as jobs;
use crate::realtime::handlers as realtime;
use crate::state::AppState;

/// Multipart framing on top of the file itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/status", patch(jobs::handle_update_status))
        // Status board
        .route("/api/v1/board", get(board::handle_get_board))
        .route("/api/v1/board/drop", post(board::handle_board_drop))
        // Real-time change feed
        .route("/api/v1/realtime", get(realtime::handle_realtime))
        // Dashboard
        .route("/api/v1/metrics", get(dashboard::handle_metrics))
        .route(
            "/api/v1/preferences",
            get(dashboard::handle_get_preferences).put(dashboard::handle_put_preferences),
        )
        // Documents
        .route(
            "/api/v1/documents",
            get(documents::handle_list_documents)
                .post(documents::handle_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
        .route("/api/v1/documents/optimize", post(documents::handle_optimize))
        .route(
            "/api/v1/documents/:id",
            delete(documents::handle_delete_document),
        )
        .route(
            "/api/v1/documents/:id/analyze",
            post(documents::handle_analyze_document),
        )
        .with_state(state)
}
