//! SQL access for the `jobs` table. Every statement is scoped by `user_id`,
//! so a job owned by someone else is indistinguishable from a missing one.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::validation::NewJob;
use crate::models::job::{Job, JobStatus};

fn not_found(job_id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {job_id} not found"))
}

pub async fn list_jobs(pool: &PgPool, user_id: Uuid) -> Result<Vec<Job>, AppError> {
    Ok(sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE user_id = $1 ORDER BY applied_date DESC, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_job(pool: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<Job, AppError> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(job_id))
}

pub async fn insert_job(pool: &PgPool, user_id: Uuid, job: &NewJob) -> Result<Job, AppError> {
    let job_id = Uuid::new_v4();
    let row = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (id, user_id, company, role, status, applied_date, link, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(user_id)
    .bind(&job.company)
    .bind(&job.role)
    .bind(job.status)
    .bind(job.applied_date)
    .bind(&job.link)
    .bind(&job.notes)
    .fetch_one(pool)
    .await?;

    info!("Created job {job_id} for user {user_id}");
    Ok(row)
}

pub async fn update_job(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
    job: &NewJob,
) -> Result<Job, AppError> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET company = $3, role = $4, status = $5, applied_date = $6,
            link = $7, notes = $8, updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(user_id)
    .bind(&job.company)
    .bind(&job.role)
    .bind(job.status)
    .bind(job.applied_date)
    .bind(&job.link)
    .bind(&job.notes)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(job_id))
}

/// The board's persistence call.
pub async fn update_job_status(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
    status: JobStatus,
) -> Result<Job, AppError> {
    let row = sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET status = $3, updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(user_id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(job_id))?;

    info!("Job {job_id} status set to {status}");
    Ok(row)
}

pub async fn delete_job(pool: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<Job, AppError> {
    let row = sqlx::query_as::<_, Job>(
        "DELETE FROM jobs WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(job_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(job_id))?;

    info!("Deleted job {job_id} for user {user_id}");
    Ok(row)
}
