use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobStatus;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_NOTES_LEN: usize = 5000;

/// Body of create and full-update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInput {
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub status: Option<String>,
    pub applied_date: Option<NaiveDate>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

/// A validated, normalized job payload ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    pub link: Option<String>,
    pub notes: Option<String>,
}

pub fn parse_status(raw: &str) -> Result<JobStatus, AppError> {
    raw.parse::<JobStatus>().map_err(|e| {
        AppError::Validation(format!(
            "{e}; expected one of applied, interviewing, offer, rejected"
        ))
    })
}

/// Trims and checks a job payload. Missing status defaults to `applied`,
/// missing date to `today`, blank link/notes to `None`.
pub fn validate_job_input(input: &JobInput, today: NaiveDate) -> Result<NewJob, AppError> {
    let company = required_text("company", &input.company)?;
    let role = required_text("role", &input.role)?;

    let status = match input.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => JobStatus::Applied,
    };

    let link = optional_text(input.link.as_deref());
    if let Some(link) = &link {
        validate_link(link)?;
    }

    let notes = optional_text(input.notes.as_deref());
    if notes.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(AppError::Validation(format!(
            "notes cannot exceed {MAX_NOTES_LEN} characters"
        )));
    }

    Ok(NewJob {
        company,
        role,
        status,
        applied_date: input.applied_date.unwrap_or(today),
        link,
        notes,
    })
}

fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{field} cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Accepts absolute http(s) URLs with a host.
fn validate_link(link: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation("link must be an http:// or https:// URL".to_string());
    let url = Url::parse(link).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
