use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::board::columns::{partition_by_status, ColumnCounts};
use crate::models::job::Job;

/// Number of trailing weeks reported in `weekly_applications`.
pub const WEEKS_REPORTED: i64 = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyCount {
    pub week_start: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMetrics {
    pub total: usize,
    pub by_status: ColumnCounts,
    /// Still in play: applied or interviewing.
    pub active: usize,
    /// Share of applications that heard back at all (anything past `applied`).
    pub response_rate: f64,
    /// Share that reached an interview (interviewing or offer).
    pub interview_rate: f64,
    pub offer_rate: f64,
    pub applied_last_7_days: usize,
    pub applied_last_30_days: usize,
    /// Oldest week first; the last week ends on `today`.
    pub weekly_applications: Vec<WeeklyCount>,
}

pub fn compute_metrics(jobs: &[Job], today: NaiveDate) -> JobMetrics {
    let total = jobs.len();
    let by_status = partition_by_status(jobs).counts();

    let heard_back = by_status.interviewing + by_status.offer + by_status.rejected;
    let interviewed = by_status.interviewing + by_status.offer;

    let weekly_applications = (0..WEEKS_REPORTED)
        .rev()
        .map(|weeks_ago| {
            let week_end = today - Duration::days(7 * weeks_ago);
            let week_start = week_end - Duration::days(6);
            WeeklyCount {
                week_start,
                count: count_between(jobs, week_start, week_end),
            }
        })
        .collect();

    JobMetrics {
        total,
        by_status,
        active: by_status.applied + by_status.interviewing,
        response_rate: rate(heard_back, total),
        interview_rate: rate(interviewed, total),
        offer_rate: rate(by_status.offer, total),
        applied_last_7_days: count_between(jobs, today - Duration::days(6), today),
        applied_last_30_days: count_between(jobs, today - Duration::days(29), today),
        weekly_applications,
    }
}

fn count_between(jobs: &[Job], start: NaiveDate, end: NaiveDate) -> usize {
    jobs.iter()
        .filter(|j| j.applied_date >= start && j.applied_date <= end)
        .count()
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 1000.0).round() / 1000.0
}
