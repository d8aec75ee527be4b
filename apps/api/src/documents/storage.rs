//! Document objects in S3 and their metadata rows.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::DocumentRow;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DOC_TYPES: &[&str] = &["resume", "cover_letter", "other"];

pub fn validate_doc_type(raw: &str) -> Result<&'static str, AppError> {
    DOC_TYPES
        .iter()
        .copied()
        .find(|t| *t == raw)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "doc_type must be one of {}",
                DOC_TYPES.join(", ")
            ))
        })
}

/// Keeps letters, digits, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn object_key(user_id: Uuid, document_id: Uuid, file_name: &str) -> String {
    format!(
        "documents/{user_id}/{document_id}/{}",
        sanitize_file_name(file_name)
    )
}

pub async fn put_object(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    content_type: &str,
    data: Bytes,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;
    info!("Uploaded s3://{bucket}/{key}");
    Ok(())
}

pub async fn get_object(s3: &S3Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let output = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;
    let data = output
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;
    Ok(data.into_bytes())
}

pub async fn delete_object(s3: &S3Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;
    info!("Deleted s3://{bucket}/{key}");
    Ok(())
}

pub struct NewDocument<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Option<Uuid>,
    pub doc_type: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i64,
    pub s3_key: &'a str,
}

pub async fn insert_document(pool: &PgPool, doc: NewDocument<'_>) -> Result<DocumentRow, AppError> {
    Ok(sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents
            (id, user_id, job_id, doc_type, file_name, content_type, size_bytes, s3_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(doc.id)
    .bind(doc.user_id)
    .bind(doc.job_id)
    .bind(doc.doc_type)
    .bind(doc.file_name)
    .bind(doc.content_type)
    .bind(doc.size_bytes)
    .bind(doc.s3_key)
    .fetch_one(pool)
    .await?)
}

pub async fn list_documents(pool: &PgPool, user_id: Uuid) -> Result<Vec<DocumentRow>, AppError> {
    Ok(sqlx::query_as::<_, DocumentRow>(
        "SELECT * FROM documents WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_document(
    pool: &PgPool,
    user_id: Uuid,
    document_id: Uuid,
) -> Result<DocumentRow, AppError> {
    sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1 AND user_id = $2")
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))
}

/// Removes the row and returns it, so the caller can delete its object.
pub async fn delete_document_row(
    pool: &PgPool,
    user_id: Uuid,
    document_id: Uuid,
) -> Result<DocumentRow, AppError> {
    sqlx::query_as::<_, DocumentRow>(
        "DELETE FROM documents WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(document_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))
}
