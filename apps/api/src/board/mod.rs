//! Status board (Kanban): four status columns, drag-and-drop moves with an
//! optimistic overlay, persistence on drop, and real-time echo merging.
//!
//! - `columns`: pure partition of jobs into columns
//! - `drag`: pointer threshold, keyboard path, drop resolution
//! - `store`: per-job `Synced | Pending | Error` state machine (rollback on failure)
//! - `controller`: async `StatusBoard` over a `JobStatusUpdater`
//! - `http`: `JobStatusUpdater` against this service's REST API
//! - `handlers`: server-side board endpoints

pub mod columns;
pub mod controller;
pub mod drag;
pub mod handlers;
pub mod http;
pub mod store;
