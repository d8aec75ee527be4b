use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::documents::analysis::{analyze_document, optimize_document};
use crate::documents::extract::extract_text;
use crate::documents::storage::{
    self, object_key, validate_doc_type, NewDocument, MAX_UPLOAD_BYTES,
};
use crate::errors::AppError;
use crate::jobs::handlers::UserIdQuery;
use crate::jobs::repo;
use crate::models::document::DocumentRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
    pub job_description: Option<String>,
}

#[derive(Deserialize)]
pub struct OptimizeRequest {
    pub text: String,
    pub job_description: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
}

fn default_doc_type() -> String {
    "resume".to_string()
}

struct UploadForm {
    user_id: Uuid,
    doc_type: &'static str,
    job_id: Option<Uuid>,
    file_name: String,
    content_type: String,
    data: Bytes,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut user_id = None;
    let mut doc_type = None;
    let mut job_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, content_type, data));
            }
            "user_id" | "doc_type" | "job_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                let value = value.trim().to_string();
                match name.as_str() {
                    "user_id" => user_id = Some(parse_uuid("user_id", &value)?),
                    "doc_type" => doc_type = Some(validate_doc_type(&value)?),
                    _ if value.is_empty() => {}
                    _ => job_id = Some(parse_uuid("job_id", &value)?),
                }
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("file cannot be empty".to_string()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "file exceeds {} MiB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    Ok(UploadForm {
        user_id: user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))?,
        doc_type: doc_type.unwrap_or("other"),
        job_id,
        file_name,
        content_type,
        data,
    })
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::Validation(format!("{field} must be a UUID")))
}

/// POST /api/v1/documents (multipart)
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentRow>), AppError> {
    let form = read_upload_form(multipart).await?;
    // The linked job must belong to the uploader; 404 otherwise.
    if let Some(job_id) = form.job_id {
        repo::get_job(&state.db, form.user_id, job_id).await?;
    }

    let document_id = Uuid::new_v4();
    let key = object_key(form.user_id, document_id, &form.file_name);
    let size_bytes = form.data.len() as i64;

    storage::put_object(
        &state.s3,
        &state.config.s3_bucket,
        &key,
        &form.content_type,
        form.data,
    )
    .await?;

    let inserted = storage::insert_document(
        &state.db,
        NewDocument {
            id: document_id,
            user_id: form.user_id,
            job_id: form.job_id,
            doc_type: form.doc_type,
            file_name: &form.file_name,
            content_type: &form.content_type,
            size_bytes,
            s3_key: &key,
        },
    )
    .await;

    match inserted {
        Ok(row) => Ok((StatusCode::CREATED, Json(row))),
        Err(e) => {
            if let Err(cleanup) =
                storage::delete_object(&state.s3, &state.config.s3_bucket, &key).await
            {
                warn!("Orphaned object {key} after failed insert: {cleanup}");
            }
            Err(e)
        }
    }
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<DocumentRow>>, AppError> {
    Ok(Json(
        storage::list_documents(&state.db, params.user_id).await?,
    ))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    // Row before object: listed documents always have their file.
    let doc = storage::delete_document_row(&state.db, params.user_id, id).await?;
    let removed = storage::delete_object(&state.s3, &state.config.s3_bucket, &doc.s3_key).await;
    if let Err(e) = removed {
        warn!("Document {id} deleted but its object remains: {e}");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/documents/:id/analyze
pub async fn handle_analyze_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>, AppError> {
    let doc = storage::get_document(&state.db, req.user_id, id).await?;
    let data = storage::get_object(&state.s3, &state.config.s3_bucket, &doc.s3_key).await?;
    let text = extract_text(&doc.content_type, &doc.file_name, &data)?;
    let analysis = analyze_document(
        &state.llm,
        &doc.doc_type,
        &text,
        req.job_description.as_deref(),
    )
    .await?;
    Ok(Json(analysis))
}

/// POST /api/v1/documents/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<Value>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let doc_type = validate_doc_type(&req.doc_type)?;
    let optimized = optimize_document(&state.llm, doc_type, &req.text, &req.job_description).await?;
    Ok(Json(optimized))
}
