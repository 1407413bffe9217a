//! Error types for session operations.
//!
//! Validation rejections are not errors: relocation and assignment report
//! them as `Ok(false)`. Errors here mean the request named something that
//! does not exist, was malformed, or is not legal in the current state.

use kanban_board::BoardError;
use kanban_ledger::LedgerError;
use kanban_rules::RulesError;
use kanban_types::{FeatureId, TaskId, WorkerId};
use uuid::Uuid;

use crate::clock::ClockError;

/// Errors returned by [`Session`](crate::session::Session) operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No worker with this id.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    /// No task with this id.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// No feature with this id.
    #[error("feature not found: {0}")]
    FeatureNotFound(FeatureId),

    /// No card of any kind with this id.
    #[error("entity not found: {0}")]
    EntityNotFound(Uuid),

    /// The request is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request is well-formed but the entity is not in a state that
    /// allows it.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A lifecycle command was illegal.
    #[error("rule violation: {source}")]
    Rules {
        /// The underlying rule error.
        #[from]
        source: RulesError,
    },

    /// The ledger refused an entry.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// A column id was unknown or on the wrong board.
    #[error("board error: {source}")]
    Board {
        /// The underlying board error.
        #[from]
        source: BoardError,
    },

    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}
