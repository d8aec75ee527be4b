//! `StatusBoard`: drives a [`BoardStore`] from UI gestures, issues the
//! persistence call for each accepted drop without waiting on it, and
//! reports the outcome on a notification channel.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::board::columns::StatusColumns;
use crate::board::drag::{DragSession, KeyboardDrag, KeyboardOutcome, PointerGesture};
use crate::board::store::{
    BoardStore, DragError, DropOutcome, Notification, PendingMove, SyncState,
};
use crate::models::job::{Job, JobStatus};
use crate::realtime::events::ChangeEvent;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("update rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    Backend(String),
}

/// The persistence seam for status changes. The callee enforces ownership.
#[async_trait]
pub trait JobStatusUpdater: Send + Sync {
    async fn update_job_status(&self, job_id: Uuid, status: JobStatus)
        -> Result<Job, BoardError>;
}

pub struct StatusBoard {
    store: Arc<Mutex<BoardStore>>,
    updater: Arc<dyn JobStatusUpdater>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl StatusBoard {
    /// Builds a board over `jobs` and returns the receiving end of its
    /// notification channel.
    pub fn new(
        jobs: Vec<Job>,
        updater: Arc<dyn JobStatusUpdater>,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let board = Self {
            store: Arc::new(Mutex::new(BoardStore::new(jobs))),
            updater,
            notifications: tx,
        };
        (board, rx)
    }

    pub fn columns(&self) -> StatusColumns {
        self.store().columns()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.store().jobs()
    }

    pub fn job(&self, job_id: Uuid) -> Option<Job> {
        self.store().job(job_id)
    }

    pub fn sync_state(&self, job_id: Uuid) -> SyncState {
        self.store().sync_state(job_id)
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.store().drag_session()
    }

    pub fn on_drag_start(&self, job_id: Uuid) -> Result<DragSession, DragError> {
        self.store().start_drag(job_id)
    }

    pub fn on_drag_cancel(&self) {
        self.store().cancel_drag();
    }

    /// Applies the drop locally and, for a real move, spawns the persistence
    /// call. Returns the handle of that call, or `None` when the drop was a
    /// no-op. Must be called inside a tokio runtime.
    pub fn on_drag_end(&self, job_id: Uuid, target: &str) -> Option<JoinHandle<()>> {
        let outcome = self.store().end_drag(job_id, target);
        match outcome {
            DropOutcome::Ignored(_) => None,
            DropOutcome::Moved(mv) => Some(self.spawn_persist(mv)),
        }
    }

    /// Pointer path: feeds a pointer move into `gesture`, starting the drag
    /// once the activation distance is crossed. A gesture the board refuses
    /// stays inactive, so releasing it is a no-op.
    pub fn on_pointer_move(
        &self,
        gesture: &mut PointerGesture,
        x: f64,
        y: f64,
    ) -> Result<bool, DragError> {
        if gesture.crossed_threshold(x, y) {
            self.on_drag_start(gesture.job_id())?;
            gesture.activate();
            return Ok(true);
        }
        Ok(false)
    }

    /// Pointer path: release. A press that never activated is a click and
    /// does nothing here.
    pub fn on_pointer_up(&self, gesture: PointerGesture, target: &str) -> Option<JoinHandle<()>> {
        if !gesture.is_active() {
            return None;
        }
        self.on_drag_end(gesture.job_id(), target)
    }

    /// Keyboard path: picks up a card for arrow-key moving.
    pub fn keyboard_pick_up(&self, job_id: Uuid) -> Result<KeyboardDrag, DragError> {
        let session = self.on_drag_start(job_id)?;
        Ok(KeyboardDrag::pick_up(job_id, session.origin_status))
    }

    /// Keyboard path: routes a drop or cancel to the same contract a pointer
    /// drop uses. Hover moves only change the keyboard cursor.
    pub fn keyboard_outcome(
        &self,
        drag: &KeyboardDrag,
        outcome: KeyboardOutcome,
    ) -> Option<JoinHandle<()>> {
        match outcome {
            KeyboardOutcome::Hover(_) => None,
            KeyboardOutcome::Cancel => {
                self.on_drag_cancel();
                None
            }
            KeyboardOutcome::Drop(status) => self.on_drag_end(drag.job_id(), status.as_str()),
        }
    }

    /// Merges one real-time event into the board.
    pub fn apply_remote_event(&self, event: &ChangeEvent) {
        self.store().apply_remote(event);
    }

    /// Replaces the board contents after a full refetch.
    pub fn replace_all(&self, jobs: Vec<Job>) {
        self.store().replace_all(jobs);
    }

    fn spawn_persist(&self, mv: PendingMove) -> JoinHandle<()> {
        let store: Weak<Mutex<BoardStore>> = Arc::downgrade(&self.store);
        let updater = Arc::clone(&self.updater);
        let notifications = self.notifications.clone();

        tokio::spawn(async move {
            let result = updater
                .update_job_status(mv.job_id, mv.to)
                .await
                .map_err(|e| e.to_string());

            let Some(store) = store.upgrade() else {
                debug!("Board gone; discarding result for job {}", mv.job_id);
                return;
            };
            let notification = lock(&store).resolve(&mv, result);
            // Receiver dropped means nobody displays notifications anymore.
            let _ = notifications.send(notification);
        })
    }

    fn store(&self) -> MutexGuard<'_, BoardStore> {
        lock(&self.store)
    }
}

fn lock(store: &Mutex<BoardStore>) -> MutexGuard<'_, BoardStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
