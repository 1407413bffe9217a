//! Error types for the `kanban-rules` crate.
//!
//! Validation never errors (it answers yes or no); these errors come from
//! explicit lifecycle commands that are illegal in the worker's current
//! state, and from date or counter arithmetic that would overflow.

use kanban_types::{WorkerId, WorkerStatus};

/// Errors raised by rule-layer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The command is not legal from the worker's current state.
    #[error("worker {worker} cannot {action} while {from:?}")]
    InvalidTransition {
        /// The worker.
        worker: WorkerId,
        /// The state the worker is in.
        from: WorkerStatus,
        /// The attempted command.
        action: &'static str,
    },

    /// A vacation must last at least one day.
    #[error("vacation length must be at least one day, got {days}")]
    InvalidVacationLength {
        /// The requested length.
        days: u32,
    },

    /// A date computation left the supported calendar range.
    #[error("date out of range: {context}")]
    DateOutOfRange {
        /// What was being computed.
        context: &'static str,
    },

    /// A day counter would overflow.
    #[error("counter overflow: {context}")]
    CounterOverflow {
        /// Which counter.
        context: &'static str,
    },
}
