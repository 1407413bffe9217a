//! `WebSocket` handler for real-time game event streaming.
//!
//! Clients connect to `GET /ws/events` and receive one JSON-encoded
//! [`SessionEvent`](kanban_core::SessionEvent) text frame per committed
//! change. A client that falls behind the broadcast buffer loses the
//! skipped events. It is then sent a `resync_required` frame carrying the
//! current day and should reload the board through the REST endpoints
//! before trusting further events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use kanban_core::Session;
use serde::Serialize;
use tracing::{debug, warn};

use crate::state::AppState;

/// Frames the stream sends besides session events.
///
/// Tagged on `event` like [`SessionEvent`](kanban_core::SessionEvent), so
/// clients dispatch on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamNotice {
    /// Events were dropped; the client's board may be stale.
    ResyncRequired {
        /// Number of events the client missed.
        skipped: u64,
        /// Game day at the time of the notice.
        day: u64,
    },
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming session events.
///
/// # Route
///
/// `GET /ws/events`
pub async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize session event: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        let day = state.handle.read(Session::day).await;
                        debug!(skipped, day, "WebSocket client lagged, requesting resync");
                        let notice = StreamNotice::ResyncRequired { skipped, day };
                        let json = match serde_json::to_string(&notice) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize resync notice: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    // Clients only listen; anything else they send is ignored.
                    _ => {}
                }
            }
        }
    }
}
