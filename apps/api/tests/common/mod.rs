mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from careertrail for tests
pub use careertrail::board::drag::{DragKey, KeyboardOutcome, PointerGesture};
pub use careertrail::board::store::{DragError, SyncState};
pub use careertrail::models::job::JobStatus;
pub use careertrail::realtime::events::{ChangeEvent, EventType};
