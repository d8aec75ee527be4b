use serde::Serialize;

use crate::models::job::{Job, JobStatus};

/// Jobs grouped into the four board columns. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusColumns {
    pub applied: Vec<Job>,
    pub interviewing: Vec<Job>,
    pub offer: Vec<Job>,
    pub rejected: Vec<Job>,
}

impl StatusColumns {
    pub fn column(&self, status: JobStatus) -> &[Job] {
        match status {
            JobStatus::Applied => &self.applied,
            JobStatus::Interviewing => &self.interviewing,
            JobStatus::Offer => &self.offer,
            JobStatus::Rejected => &self.rejected,
        }
    }

    fn column_mut(&mut self, status: JobStatus) -> &mut Vec<Job> {
        match status {
            JobStatus::Applied => &mut self.applied,
            JobStatus::Interviewing => &mut self.interviewing,
            JobStatus::Offer => &mut self.offer,
            JobStatus::Rejected => &mut self.rejected,
        }
    }

    pub fn counts(&self) -> ColumnCounts {
        ColumnCounts {
            applied: self.applied.len(),
            interviewing: self.interviewing.len(),
            offer: self.offer.len(),
            rejected: self.rejected.len(),
        }
    }

    pub fn total(&self) -> usize {
        JobStatus::ALL.iter().map(|s| self.column(*s).len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnCounts {
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
}

/// Places every job in the column named by its status, preserving input order
/// within each column.
pub fn partition_by_status(jobs: &[Job]) -> StatusColumns {
    let mut columns = StatusColumns::default();
    for job in jobs {
        columns.column_mut(job.status).push(job.clone());
    }
    columns
}

/// Maps a drop-target id to a column. Anything that is not exactly one of the
/// four status ids (including "", a card id, or a differently-cased name) is
/// not a column.
pub fn parse_column_id(target: &str) -> Option<JobStatus> {
    target.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::test_support::job;

    #[test]
    fn test_every_job_lands_in_exactly_one_column() {
        let jobs = vec![
            job("a", JobStatus::Applied),
            job("b", JobStatus::Rejected),
            job("c", JobStatus::Interviewing),
            job("d", JobStatus::Applied),
            job("e", JobStatus::Offer),
            job("f", JobStatus::Rejected),
        ];
        let columns = partition_by_status(&jobs);

        assert_eq!(columns.total(), jobs.len());

        let mut seen = HashSet::new();
        for status in JobStatus::ALL {
            for j in columns.column(status) {
                assert_eq!(j.status, status);
                assert!(seen.insert(j.id), "job {} appeared twice", j.id);
            }
        }
        let input: HashSet<_> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(seen, input);
    }

    #[test]
    fn test_column_order_preserved() {
        let jobs = vec![
            job("first", JobStatus::Applied),
            job("other", JobStatus::Offer),
            job("second", JobStatus::Applied),
        ];
        let columns = partition_by_status(&jobs);
        let companies: Vec<_> = columns.applied.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(companies, vec!["Company first", "Company second"]);
    }

    #[test]
    fn test_empty_input_gives_empty_columns() {
        let columns = partition_by_status(&[]);
        assert_eq!(columns.counts(), ColumnCounts::default());
    }

    #[test]
    fn test_counts() {
        let jobs = vec![
            job("a", JobStatus::Offer),
            job("b", JobStatus::Offer),
            job("c", JobStatus::Rejected),
        ];
        let counts = partition_by_status(&jobs).counts();
        assert_eq!(counts.offer, 2);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.applied, 0);
    }

    #[test]
    fn test_parse_column_id() {
        assert_eq!(parse_column_id("offer"), Some(JobStatus::Offer));
        assert_eq!(parse_column_id("Offer"), None);
        assert_eq!(parse_column_id(""), None);
        assert_eq!(parse_column_id("board-trash"), None);
    }
}
