//! Shared access to one session.
//!
//! Every request locks the session, runs to completion and drains the
//! session outbox. The lock is released before the drained events reach the
//! [`EventSink`], so a slow subscriber never holds up a tick. Tokio's mutex
//! is FIFO-fair: requests queue behind an in-flight tick in arrival order.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::events::{EventSink, SessionEvent};
use crate::session::Session;

/// A cloneable handle to a session and the sink its events go to.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<Session>>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Wrap a session.
    pub fn new(session: Session, sink: Arc<dyn EventSink>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            sink,
        }
    }

    /// Run a mutation, then publish the events it produced.
    pub async fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let (result, events) = {
            let mut session = self.session.lock().await;
            let result = f(&mut session);
            (result, session.drain_events())
        };
        self.publish(&events);
        result
    }

    /// Run a read-only query.
    pub async fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self.session.lock().await;
        f(&session)
    }

    fn publish(&self, events: &[SessionEvent]) {
        for event in events {
            self.sink.publish(event);
        }
    }
}
