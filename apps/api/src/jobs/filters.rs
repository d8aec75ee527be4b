//! Search, status filter and sort for the job list.

use std::cmp::Ordering;

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::validation::parse_status;
use crate::models::job::{Job, JobStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct JobListQuery {
    pub user_id: Uuid,
    pub status: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    AppliedDate,
    Company,
    UpdatedAt,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub query: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
}

impl JobFilter {
    pub fn from_query(query: &JobListQuery) -> Result<Self, AppError> {
        let status = query.status.as_deref().map(parse_status).transpose()?;

        let sort = match query.sort.as_deref() {
            None | Some("applied_date") => SortField::AppliedDate,
            Some("company") => SortField::Company,
            Some("updated_at") => SortField::UpdatedAt,
            Some("status") => SortField::Status,
            Some(other) => {
                return Err(AppError::Validation(format!("unknown sort field '{other}'")))
            }
        };

        let order = match query.order.as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => return Err(AppError::Validation(format!("unknown order '{other}'"))),
        };

        let query = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        Ok(Self {
            status,
            query,
            sort,
            order,
        })
    }

    pub fn matches(&self, job: &Job) -> bool {
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        match &self.query {
            None => true,
            Some(q) => {
                job.company.to_lowercase().contains(q)
                    || job.role.to_lowercase().contains(q)
                    || job
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(q))
            }
        }
    }

    pub fn apply(&self, jobs: Vec<Job>) -> Vec<Job> {
        let mut filtered: Vec<Job> = jobs.into_iter().filter(|j| self.matches(j)).collect();
        filtered.sort_by(|a, b| {
            let primary = match self.sort {
                SortField::AppliedDate => a.applied_date.cmp(&b.applied_date),
                SortField::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortField::Status => a.status.cmp(&b.status),
            };
            let ordered = match self.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            // Stable tie-break regardless of direction.
            match ordered {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            }
        });
        filtered
    }
}
