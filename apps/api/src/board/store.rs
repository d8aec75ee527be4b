//! Board state: the authoritative job list plus a per-job optimistic overlay.
//!
//! Displayed status for a job is its overlay status while a move is pending,
//! and the last authoritative (server) status otherwise. A failed move rolls
//! back by simply dropping the overlay.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::board::columns::{partition_by_status, StatusColumns};
use crate::board::drag::{resolve_drop, DragSession, IgnoreReason};
use crate::models::job::{Job, JobStatus};
use crate::realtime::events::{apply_event, ChangeEvent, EventType};

/// Per-job reconciliation state. Jobs with no entry are `Synced`.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    Synced,
    /// A move to `status` is in flight; `seq` identifies the drop that issued it.
    Pending { status: JobStatus, seq: u64 },
    /// The last move to `status` failed and was rolled back.
    Error { status: JobStatus, reason: String },
}

/// A move accepted by the board and waiting for its persistence call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub job_id: Uuid,
    pub from: JobStatus,
    pub to: JobStatus,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Ignored(IgnoreReason),
    Moved(PendingMove),
}

/// Transient, user-visible message produced when a persistence call settles.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Moved {
        job_id: Uuid,
        company: String,
        status: JobStatus,
    },
    MoveFailed {
        job_id: Uuid,
        attempted: JobStatus,
        reason: String,
    },
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::MoveFailed { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Notification::Moved {
                company, status, ..
            } => format!("Moved {company} to {status}"),
            Notification::MoveFailed {
                attempted, reason, ..
            } => format!("Could not move job to {attempted}: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DragError {
    #[error("another drag is already in progress")]
    AlreadyDragging,

    #[error("job {0} is not on the board")]
    UnknownJob(Uuid),
}

#[derive(Debug, Default)]
pub struct BoardStore {
    server: Vec<Job>,
    sync: HashMap<Uuid, SyncState>,
    drag: Option<DragSession>,
    next_seq: u64,
}

impl BoardStore {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self {
            server: jobs,
            ..Self::default()
        }
    }

    /// Jobs as the user should see them, with pending overlays applied.
    pub fn jobs(&self) -> Vec<Job> {
        self.server.iter().map(|j| self.displayed(j)).collect()
    }

    pub fn job(&self, job_id: Uuid) -> Option<Job> {
        self.find(job_id).map(|j| self.displayed(j))
    }

    pub fn columns(&self) -> StatusColumns {
        partition_by_status(&self.jobs())
    }

    /// Last values confirmed by the backend, without overlays.
    pub fn server_jobs(&self) -> &[Job] {
        &self.server
    }

    pub fn sync_state(&self, job_id: Uuid) -> SyncState {
        self.sync.get(&job_id).cloned().unwrap_or(SyncState::Synced)
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn start_drag(&mut self, job_id: Uuid) -> Result<DragSession, DragError> {
        if self.drag.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        let job = self.job(job_id).ok_or(DragError::UnknownJob(job_id))?;
        let session = DragSession {
            active_job_id: job_id,
            origin_status: job.status,
        };
        debug!("Drag started for job {job_id} from {}", job.status);
        self.drag = Some(session);
        Ok(session)
    }

    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            debug!("Drag cancelled for job {}", session.active_job_id);
        }
    }

    /// Ends the current gesture. A valid move is applied to the overlay
    /// immediately; the caller is responsible for issuing the persistence call
    /// and feeding its result back through [`BoardStore::resolve`].
    pub fn end_drag(&mut self, job_id: Uuid, target: &str) -> DropOutcome {
        if let Some(session) = self.drag {
            if session.active_job_id != job_id {
                debug!(
                    "Drop of job {job_id} ignored: job {} is being dragged",
                    session.active_job_id
                );
                return DropOutcome::Ignored(IgnoreReason::OtherDragActive);
            }
        }
        self.drag = None;

        let Some(current) = self.job(job_id).map(|j| j.status) else {
            return DropOutcome::Ignored(IgnoreReason::UnknownJob);
        };

        match resolve_drop(current, target) {
            Err(reason) => {
                debug!("Drop of job {job_id} on '{target}' ignored: {reason:?}");
                DropOutcome::Ignored(reason)
            }
            Ok(to) => {
                self.next_seq += 1;
                let seq = self.next_seq;
                self.sync
                    .insert(job_id, SyncState::Pending { status: to, seq });
                debug!("Job {job_id} moved {current} -> {to} (seq {seq})");
                DropOutcome::Moved(PendingMove {
                    job_id,
                    from: current,
                    to,
                    seq,
                })
            }
        }
    }

    /// Applies the settled persistence call for `mv`. Results for a drop that
    /// has since been superseded by a newer drop of the same job only refresh
    /// the server value; they never touch the newer overlay.
    pub fn resolve(&mut self, mv: &PendingMove, result: Result<Job, String>) -> Notification {
        let is_latest = matches!(
            self.sync.get(&mv.job_id),
            Some(SyncState::Pending { seq, .. }) if *seq == mv.seq
        );

        match result {
            Ok(record) => {
                let company = record.company.clone();
                self.merge_server_record(record);
                if is_latest {
                    self.sync.remove(&mv.job_id);
                }
                Notification::Moved {
                    job_id: mv.job_id,
                    company,
                    status: mv.to,
                }
            }
            Err(reason) => {
                warn!(
                    "Persisting job {} -> {} failed: {reason}",
                    mv.job_id, mv.to
                );
                if is_latest {
                    self.sync.insert(
                        mv.job_id,
                        SyncState::Error {
                            status: mv.to,
                            reason: reason.clone(),
                        },
                    );
                }
                Notification::MoveFailed {
                    job_id: mv.job_id,
                    attempted: mv.to,
                    reason,
                }
            }
        }
    }

    /// Folds a real-time change into the server list. Echoes older than the
    /// value already held are dropped (last write wins on `updated_at`).
    /// Pending overlays stay visible until their call resolves.
    pub fn apply_remote(&mut self, event: &ChangeEvent) {
        if !event.is_for_jobs() {
            return;
        }
        let record = &event.record;

        if event.event_type != EventType::Delete {
            if let Some(existing) = self.find(record.id) {
                if record.updated_at < existing.updated_at {
                    debug!("Stale echo for job {} ignored", record.id);
                    return;
                }
            }
        }

        self.server = apply_event(std::mem::take(&mut self.server), event);

        match event.event_type {
            EventType::Delete => {
                self.sync.remove(&record.id);
                if self.drag.is_some_and(|d| d.active_job_id == record.id) {
                    self.drag = None;
                }
            }
            // A pending overlay is only cleared by its own call resolving: a
            // matching status here may be the echo of an earlier drop.
            EventType::Insert | EventType::Update => {
                if matches!(self.sync.get(&record.id), Some(SyncState::Error { .. })) {
                    self.sync.remove(&record.id);
                }
            }
        }
    }

    /// Replaces the server list after a full refetch. In-flight overlays for
    /// jobs that still exist survive; error markers are cleared.
    pub fn replace_all(&mut self, jobs: Vec<Job>) {
        self.server = jobs;
        let server = &self.server;
        self.sync.retain(|id, state| {
            matches!(state, SyncState::Pending { .. }) && server.iter().any(|j| j.id == *id)
        });
        if let Some(session) = self.drag {
            if self.find(session.active_job_id).is_none() {
                self.drag = None;
            }
        }
    }

    fn find(&self, job_id: Uuid) -> Option<&Job> {
        self.server.iter().find(|j| j.id == job_id)
    }

    fn displayed(&self, job: &Job) -> Job {
        match self.sync.get(&job.id) {
            Some(SyncState::Pending { status, .. }) => Job {
                status: *status,
                ..job.clone()
            },
            _ => job.clone(),
        }
    }

    fn merge_server_record(&mut self, record: Job) {
        // A job deleted while its call was in flight stays deleted.
        if let Some(existing) = self.server.iter_mut().find(|j| j.id == record.id) {
            if record.updated_at >= existing.updated_at {
                *existing = record;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{job, job_id, moved};

    fn store() -> BoardStore {
        BoardStore::new(vec![
            job("j1", JobStatus::Applied),
            job("j2", JobStatus::Interviewing),
        ])
    }

    fn expect_move(outcome: DropOutcome) -> PendingMove {
        match outcome {
            DropOutcome::Moved(mv) => mv,
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn test_start_drag_records_origin() {
        let mut s = store();
        let session = s.start_drag(job_id("j2")).unwrap();
        assert_eq!(session.origin_status, JobStatus::Interviewing);
        assert_eq!(s.drag_session(), Some(session));
    }

    #[test]
    fn test_second_drag_rejected_while_first_active() {
        let mut s = store();
        s.start_drag(job_id("j1")).unwrap();
        assert_eq!(s.start_drag(job_id("j2")), Err(DragError::AlreadyDragging));
    }

    #[test]
    fn test_drop_of_other_job_keeps_active_session() {
        let mut s = store();
        let session = s.start_drag(job_id("j1")).unwrap();

        let outcome = s.end_drag(job_id("j2"), "offer");

        assert_eq!(outcome, DropOutcome::Ignored(IgnoreReason::OtherDragActive));
        assert_eq!(s.drag_session(), Some(session));
        assert_eq!(s.job(job_id("j2")).unwrap().status, JobStatus::Interviewing);
        assert_eq!(s.sync_state(job_id("j2")), SyncState::Synced);
    }

    #[test]
    fn test_start_drag_unknown_job() {
        let mut s = store();
        let ghost = job_id("ghost");
        assert_eq!(s.start_drag(ghost), Err(DragError::UnknownJob(ghost)));
    }

    #[test]
    fn test_drop_applies_optimistic_overlay() {
        let mut s = store();
        s.start_drag(job_id("j1")).unwrap();
        let mv = expect_move(s.end_drag(job_id("j1"), "offer"));

        assert_eq!(mv.from, JobStatus::Applied);
        assert_eq!(mv.to, JobStatus::Offer);
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Offer);
        assert_eq!(s.server_jobs()[0].status, JobStatus::Applied);
        assert!(s.drag_session().is_none());
        assert_eq!(s.columns().offer.len(), 1);
    }

    #[test]
    fn test_invalid_target_leaves_state_untouched() {
        let mut s = store();
        let before = s.jobs();
        let outcome = s.end_drag(job_id("j1"), "outside");
        assert_eq!(outcome, DropOutcome::Ignored(IgnoreReason::InvalidTarget));
        assert_eq!(s.jobs(), before);
        assert_eq!(s.sync_state(job_id("j1")), SyncState::Synced);
    }

    #[test]
    fn test_same_column_drop_ignored() {
        let mut s = store();
        let outcome = s.end_drag(job_id("j2"), "interviewing");
        assert_eq!(outcome, DropOutcome::Ignored(IgnoreReason::SameColumn));
    }

    #[test]
    fn test_success_clears_overlay_and_takes_server_record() {
        let mut s = store();
        let mv = expect_move(s.end_drag(job_id("j1"), "interviewing"));
        let record = moved(&job("j1", JobStatus::Applied), JobStatus::Interviewing, 5);

        let note = s.resolve(&mv, Ok(record.clone()));

        assert!(!note.is_error());
        assert_eq!(s.sync_state(job_id("j1")), SyncState::Synced);
        assert_eq!(s.job(job_id("j1")), Some(record));
    }

    #[test]
    fn test_failure_rolls_back_and_marks_error() {
        let mut s = store();
        let mv = expect_move(s.end_drag(job_id("j1"), "rejected"));

        let note = s.resolve(&mv, Err("connection reset".to_string()));

        assert!(note.is_error());
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Applied);
        assert_eq!(
            s.sync_state(job_id("j1")),
            SyncState::Error {
                status: JobStatus::Rejected,
                reason: "connection reset".to_string()
            }
        );
    }

    #[test]
    fn test_superseded_failure_keeps_newer_overlay() {
        let mut s = store();
        let first = expect_move(s.end_drag(job_id("j1"), "interviewing"));
        let second = expect_move(s.end_drag(job_id("j1"), "offer"));
        assert_eq!(second.from, JobStatus::Interviewing);

        s.resolve(&first, Err("timeout".to_string()));

        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Offer);
        assert!(matches!(
            s.sync_state(job_id("j1")),
            SyncState::Pending { seq, .. } if seq == second.seq
        ));
    }

    #[test]
    fn test_out_of_order_success_does_not_regress() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        let first = expect_move(s.end_drag(job_id("j1"), "interviewing"));
        let second = expect_move(s.end_drag(job_id("j1"), "offer"));

        s.resolve(&second, Ok(moved(&base, JobStatus::Offer, 20)));
        s.resolve(&first, Ok(moved(&base, JobStatus::Interviewing, 10)));

        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Offer);
        assert_eq!(s.sync_state(job_id("j1")), SyncState::Synced);
    }

    #[test]
    fn test_matching_echo_is_idempotent() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        let mv = expect_move(s.end_drag(job_id("j1"), "offer"));
        let record = moved(&base, JobStatus::Offer, 3);

        s.apply_remote(&ChangeEvent::jobs(EventType::Update, record.clone()));
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Offer);
        assert!(matches!(s.sync_state(job_id("j1")), SyncState::Pending { .. }));
        s.resolve(&mv, Ok(record));

        assert_eq!(s.sync_state(job_id("j1")), SyncState::Synced);
        assert_eq!(s.jobs().len(), 2);
        assert_eq!(s.columns().offer.len(), 1);
    }

    #[test]
    fn test_earlier_echoes_do_not_undo_latest_drop() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        let first = expect_move(s.end_drag(job_id("j1"), "interviewing"));
        let second = expect_move(s.end_drag(job_id("j1"), "offer"));
        let third = expect_move(s.end_drag(job_id("j1"), "interviewing"));

        // Echo of the first drop carries the same status as the third.
        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Interviewing, 1),
        ));
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Interviewing);
        assert!(matches!(
            s.sync_state(job_id("j1")),
            SyncState::Pending { seq, .. } if seq == third.seq
        ));

        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Offer, 2),
        ));
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Interviewing);

        s.resolve(&first, Ok(moved(&base, JobStatus::Interviewing, 1)));
        s.resolve(&second, Ok(moved(&base, JobStatus::Offer, 2)));
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Interviewing);

        s.resolve(&third, Ok(moved(&base, JobStatus::Interviewing, 3)));
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Interviewing);
        assert_eq!(s.sync_state(job_id("j1")), SyncState::Synced);
        assert_eq!(s.server_jobs()[0].status, JobStatus::Interviewing);
    }

    #[test]
    fn test_foreign_echo_during_pending_keeps_overlay_visible() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        expect_move(s.end_drag(job_id("j1"), "offer"));

        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Rejected, 2),
        ));

        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Offer);
        assert_eq!(s.server_jobs()[0].status, JobStatus::Rejected);
    }

    #[test]
    fn test_rollback_uses_latest_echoed_value() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        let mv = expect_move(s.end_drag(job_id("j1"), "offer"));
        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Rejected, 2),
        ));

        s.resolve(&mv, Err("500".to_string()));

        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Rejected);
    }

    #[test]
    fn test_stale_echo_ignored() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Offer, 30),
        ));
        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Interviewing, 10),
        ));
        assert_eq!(s.job(job_id("j1")).unwrap().status, JobStatus::Offer);
    }

    #[test]
    fn test_echo_clears_error_marker() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        let mv = expect_move(s.end_drag(job_id("j1"), "offer"));
        s.resolve(&mv, Err("boom".to_string()));

        s.apply_remote(&ChangeEvent::jobs(
            EventType::Update,
            moved(&base, JobStatus::Applied, 4),
        ));
        assert_eq!(s.sync_state(job_id("j1")), SyncState::Synced);
    }

    #[test]
    fn test_remote_delete_cancels_drag_and_overlay() {
        let mut s = store();
        s.start_drag(job_id("j1")).unwrap();
        s.apply_remote(&ChangeEvent::jobs(
            EventType::Delete,
            job("j1", JobStatus::Applied),
        ));

        assert!(s.drag_session().is_none());
        assert!(s.job(job_id("j1")).is_none());
        assert_eq!(
            s.end_drag(job_id("j1"), "offer"),
            DropOutcome::Ignored(IgnoreReason::UnknownJob)
        );
    }

    #[test]
    fn test_success_after_remote_delete_does_not_resurrect() {
        let mut s = store();
        let base = job("j1", JobStatus::Applied);
        let mv = expect_move(s.end_drag(job_id("j1"), "offer"));
        s.apply_remote(&ChangeEvent::jobs(EventType::Delete, base.clone()));

        s.resolve(&mv, Ok(moved(&base, JobStatus::Offer, 5)));
        assert!(s.job(job_id("j1")).is_none());
    }

    #[test]
    fn test_replace_all_keeps_pending_drops_errors() {
        let mut s = store();
        let pending = expect_move(s.end_drag(job_id("j1"), "offer"));
        let failed = expect_move(s.end_drag(job_id("j2"), "rejected"));
        s.resolve(&failed, Err("nope".to_string()));

        s.replace_all(vec![
            job("j1", JobStatus::Applied),
            job("j2", JobStatus::Interviewing),
        ]);

        assert!(matches!(
            s.sync_state(job_id("j1")),
            SyncState::Pending { seq, .. } if seq == pending.seq
        ));
        assert_eq!(s.sync_state(job_id("j2")), SyncState::Synced);
    }

    #[test]
    fn test_notification_messages() {
        let ok = Notification::Moved {
            job_id: Uuid::nil(),
            company: "Acme".to_string(),
            status: JobStatus::Offer,
        };
        assert_eq!(ok.message(), "Moved Acme to offer");

        let err = Notification::MoveFailed {
            job_id: Uuid::nil(),
            attempted: JobStatus::Rejected,
            reason: "timeout".to_string(),
        };
        assert_eq!(err.message(), "Could not move job to rejected: timeout");
    }
}
