//! Fixtures shared by the inline unit tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::models::job::{Job, JobStatus};

/// Stable id for a short test key such as `"j1"`.
pub fn job_id(key: &str) -> Uuid {
    let hash = key
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u128, |h, b| {
            (h ^ b as u128).wrapping_mul(0x0100_0000_01b3)
        });
    Uuid::from_u128(hash)
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn job(key: &str, status: JobStatus) -> Job {
    Job {
        id: job_id(key),
        user_id: Uuid::nil(),
        company: format!("Company {key}"),
        role: "Software Engineer".to_string(),
        status,
        applied_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        link: None,
        notes: None,
        created_at: base_time(),
        updated_at: base_time(),
    }
}

/// Same job with a new status, stamped `secs` after the base time.
pub fn moved(original: &Job, status: JobStatus, secs: i64) -> Job {
    Job {
        status,
        updated_at: base_time() + Duration::seconds(secs),
        ..original.clone()
    }
}
