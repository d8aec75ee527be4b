use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::jobs::handlers::UserIdQuery;
use crate::realtime::events::ChangeEvent;
use crate::state::AppState;

/// GET /api/v1/realtime (WebSocket)
///
/// Streams the caller's change events as JSON text frames.
pub async fn handle_realtime(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Response {
    // Subscribe before the upgrade completes so nothing published in between is lost.
    let rx = state.feed.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, rx, params.user_id))
}

async fn stream_events(
    mut socket: WebSocket,
    mut rx: broadcast::Receiver<ChangeEvent>,
    user_id: Uuid,
) {
    info!("Real-time subscriber connected for user {user_id}");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    if !visible_to(&event, user_id) {
                        continue;
                    }
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Failed to serialize change event: {e}");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Real-time subscriber for user {user_id} skipped {skipped} event(s)");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("Real-time subscriber for user {user_id} disconnected");
}

fn visible_to(event: &ChangeEvent, user_id: Uuid) -> bool {
    event.record.user_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobStatus;
    use crate::realtime::events::EventType;
    use crate::test_support::job;

    #[test]
    fn test_events_only_visible_to_owner() {
        let mut record = job("j1", JobStatus::Applied);
        let owner = Uuid::new_v4();
        record.user_id = owner;
        let event = ChangeEvent::jobs(EventType::Insert, record);

        assert!(visible_to(&event, owner));
        assert!(!visible_to(&event, Uuid::new_v4()));
    }
}
