//! Error types for the `kanban-board` crate.

use kanban_types::BoardType;

/// Errors raised when a column id does not fit the board topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The column id is not declared on any board.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// The column exists but belongs to another board.
    #[error("column {column} is not on the {board:?} board")]
    WrongBoard {
        /// The offending column id.
        column: String,
        /// The board the caller expected.
        board: BoardType,
    },
}
