//! Drag gestures: pointer activation threshold, the keyboard path, and the
//! drop resolution rule shared by both.

use serde::Serialize;
use uuid::Uuid;

use crate::board::columns::parse_column_id;
use crate::models::job::JobStatus;

/// Pointer travel (in px) before a press turns into a drag instead of a click.
pub const ACTIVATION_DISTANCE_PX: f64 = 8.0;

/// The job being dragged and the column it was picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub active_job_id: Uuid,
    pub origin_status: JobStatus,
}

/// Why a drop did nothing. These are normal gesture outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Dropped outside the board or on something that is not a column.
    InvalidTarget,
    /// Dropped back onto the column it already sits in.
    SameColumn,
    /// The job vanished (deleted remotely) before the drop landed.
    UnknownJob,
    /// A different card owns the active drag.
    OtherDragActive,
}

/// Decides whether dropping a job currently in `current` onto `target` is a move.
pub fn resolve_drop(current: JobStatus, target: &str) -> Result<JobStatus, IgnoreReason> {
    let target = parse_column_id(target).ok_or(IgnoreReason::InvalidTarget)?;
    if target == current {
        return Err(IgnoreReason::SameColumn);
    }
    Ok(target)
}

/// Tracks a pointer press until it either travels far enough to become a drag
/// or is released as a click.
#[derive(Debug, Clone)]
pub struct PointerGesture {
    job_id: Uuid,
    origin: (f64, f64),
    threshold: f64,
    activated: bool,
}

impl PointerGesture {
    pub fn press(job_id: Uuid, x: f64, y: f64) -> Self {
        Self::with_threshold(job_id, x, y, ACTIVATION_DISTANCE_PX)
    }

    pub fn with_threshold(job_id: Uuid, x: f64, y: f64, threshold: f64) -> Self {
        Self {
            job_id,
            origin: (x, y),
            threshold,
            activated: false,
        }
    }

    /// True while the press is not yet a drag and the pointer has travelled
    /// at least the threshold from where it went down.
    pub fn crossed_threshold(&self, x: f64, y: f64) -> bool {
        if self.activated {
            return false;
        }
        let (ox, oy) = self.origin;
        (x - ox).hypot(y - oy) >= self.threshold
    }

    /// Marks the gesture as a drag. Only called once the board accepted it.
    pub fn activate(&mut self) {
        self.activated = true;
    }

    pub fn is_active(&self) -> bool {
        self.activated
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKey {
    Left,
    Right,
    Drop,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardOutcome {
    /// Still carrying the card; it now hovers over this column.
    Hover(JobStatus),
    /// Released over this column.
    Drop(JobStatus),
    Cancel,
}

/// Keyboard-driven drag: pick a card up, walk it across columns with the
/// arrow keys, then drop or cancel. Produces the same column ids a pointer
/// drop would, so both feed the same `on_drag_end` path.
#[derive(Debug, Clone)]
pub struct KeyboardDrag {
    job_id: Uuid,
    hover: JobStatus,
}

impl KeyboardDrag {
    pub fn pick_up(job_id: Uuid, origin: JobStatus) -> Self {
        Self {
            job_id,
            hover: origin,
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn hover(&self) -> JobStatus {
        self.hover
    }

    pub fn key(&mut self, key: DragKey) -> KeyboardOutcome {
        let index = self.hover.column_index();
        match key {
            DragKey::Left => {
                self.hover = JobStatus::ALL[index.saturating_sub(1)];
                KeyboardOutcome::Hover(self.hover)
            }
            DragKey::Right => {
                self.hover = JobStatus::ALL[(index + 1).min(JobStatus::ALL.len() - 1)];
                KeyboardOutcome::Hover(self.hover)
            }
            DragKey::Drop => KeyboardOutcome::Drop(self.hover),
            DragKey::Cancel => KeyboardOutcome::Cancel,
        }
    }
}
