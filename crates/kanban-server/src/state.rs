//! Shared application state for the game API server.
//!
//! [`AppState`] holds the broadcast channel every connected client listens
//! on and the [`SessionHandle`] every request goes through. The channel's
//! sender doubles as the session's event sink.

use std::sync::Arc;

use kanban_core::{Session, SessionEvent, SessionHandle};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for session events.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Broadcast sender for session events.
    pub tx: broadcast::Sender<SessionEvent>,
    /// The game session.
    pub handle: SessionHandle,
}

impl AppState {
    /// Wrap a session, publishing its events on a fresh broadcast channel.
    pub fn new(session: Session) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let handle = SessionHandle::new(session, Arc::new(tx.clone()));
        Self { tx, handle }
    }

    /// Subscribe to the event broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}
