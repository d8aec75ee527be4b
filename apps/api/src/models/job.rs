use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Application status. Closed set: every job sits in exactly one of these.
/// Stored as TEXT; the column carries a CHECK constraint on the same values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl JobStatus {
    /// Board column order, left to right.
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
        }
    }

    /// Position of this status in `ALL`.
    pub fn column_index(&self) -> usize {
        match self {
            JobStatus::Applied => 0,
            JobStatus::Interviewing => 1,
            JobStatus::Offer => 2,
            JobStatus::Rejected => 3,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("unknown job status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for JobStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(JobStatus::Applied),
            "interviewing" => Ok(JobStatus::Interviewing),
            "offer" => Ok(JobStatus::Offer),
            "rejected" => Ok(JobStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
