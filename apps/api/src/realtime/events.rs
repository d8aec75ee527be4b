//! Change events for the `jobs` table and the pure reducer that folds them
//! into an in-memory job list.

use serde::{Deserialize, Serialize};

use crate::models::job::Job;

pub const JOBS_TABLE: &str = "jobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Insert,
    Update,
    Delete,
}

/// One row-level change. For deletes `record` is the row as it was removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub event_type: EventType,
    pub record: Job,
}

impl ChangeEvent {
    pub fn jobs(event_type: EventType, record: Job) -> Self {
        Self {
            table: JOBS_TABLE.to_string(),
            event_type,
            record,
        }
    }

    pub fn is_for_jobs(&self) -> bool {
        self.table == JOBS_TABLE
    }
}

/// Folds one event into `jobs` by record id.
///
/// - insert: append, or replace if the id is already present (duplicate echo)
/// - update: replace in place, or append when the id is unknown
/// - delete: remove, no-op when absent
///
/// Events for other tables leave the list untouched.
pub fn apply_event(mut jobs: Vec<Job>, event: &ChangeEvent) -> Vec<Job> {
    if !event.is_for_jobs() {
        return jobs;
    }

    let position = jobs.iter().position(|j| j.id == event.record.id);
    match (event.event_type, position) {
        (EventType::Insert | EventType::Update, Some(i)) => jobs[i] = event.record.clone(),
        (EventType::Insert | EventType::Update, None) => jobs.push(event.record.clone()),
        (EventType::Delete, Some(i)) => {
            jobs.remove(i);
        }
        (EventType::Delete, None) => {}
    }
    jobs
}
