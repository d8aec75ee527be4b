// Real-time change feed: broadcast of row-level job changes, the pure
// reducer clients use to fold them, and the WebSocket endpoint.

pub mod events;
pub mod feed;
pub mod handlers;
