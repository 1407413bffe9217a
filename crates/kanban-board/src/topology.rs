//! Lookups over the column tables.
//!
//! Column ids are unique across boards, so every query takes a bare column
//! id and resolves the owning board itself. Unknown ids resolve to `None`
//! (or `false`), never to a panic.

use kanban_types::{BoardType, ColumnKind, Role, WorkStatus};

use crate::columns::{
    ANALYSIS_BOARD, BACKEND_BOARD, BOARDS, BoardSpec, ColumnSpec, FRONTEND_BOARD, SUMMARY_BOARD,
};
use crate::error::BoardError;

/// The definition of a board.
pub fn board(board: BoardType) -> &'static BoardSpec {
    match board {
        BoardType::Analysis => &ANALYSIS_BOARD,
        BoardType::Backend => &BACKEND_BOARD,
        BoardType::Frontend => &FRONTEND_BOARD,
        BoardType::Summary => &SUMMARY_BOARD,
    }
}

/// Every column of every board, in board then display order.
pub fn all_columns() -> impl Iterator<Item = &'static ColumnSpec> {
    BOARDS.iter().flat_map(|b| b.columns.iter())
}

/// Find a column by id.
pub fn column(id: &str) -> Option<&'static ColumnSpec> {
    all_columns().find(|c| c.id == id)
}

/// Find a column by id, failing on unknown ids.
pub fn require_column(id: &str) -> Result<&'static ColumnSpec, BoardError> {
    column(id).ok_or_else(|| BoardError::UnknownColumn(id.to_owned()))
}

/// Find a column by id and check it belongs to `expected`.
pub fn require_column_on(
    id: &str,
    expected: BoardType,
) -> Result<&'static ColumnSpec, BoardError> {
    let found = require_column(id)?;
    if board_of(id) == Some(expected) {
        Ok(found)
    } else {
        Err(BoardError::WrongBoard {
            column: id.to_owned(),
            board: expected,
        })
    }
}

/// The board owning a column.
pub fn board_of(id: &str) -> Option<BoardType> {
    BOARDS
        .iter()
        .find(|b| b.columns.iter().any(|c| c.id == id))
        .map(|b| b.board)
}

/// The first column of a board.
pub fn first_column(board_type: BoardType) -> Option<&'static str> {
    board(board_type).columns.first().map(|c| c.id)
}

/// Where labor completion sends a card sitting in `id`.
pub fn next_column(id: &str) -> Option<&'static str> {
    column(id).and_then(|c| c.next)
}

/// The column a card in `id` may be dropped back to.
pub fn backward_target(id: &str) -> Option<&'static str> {
    column(id).and_then(|c| c.intake)
}

/// Whether moving a card from `from` to `to` is a permitted backward drop.
pub fn is_backward_drop(from: &str, to: &str) -> bool {
    backward_target(from) == Some(to)
}

/// Whether a card in `intake` is pulled into `doing` when assigned to a
/// worker standing in `doing`.
pub fn pulls_into(intake: &str, doing: &str) -> bool {
    column(doing).and_then(|c| c.intake) == Some(intake)
}

/// Role a worker must hold to stand in `id`.
pub fn required_role(id: &str) -> Option<Role> {
    column(id).and_then(|c| c.required_role)
}

/// The columns of `board_type` that workers may occupy.
pub fn worker_columns(board_type: BoardType) -> impl Iterator<Item = &'static ColumnSpec> {
    board(board_type)
        .columns
        .iter()
        .filter(|c| c.required_role.is_some())
}

/// Whether `id` is in the worker allow-list of `board_type`.
pub fn is_worker_column(board_type: BoardType, id: &str) -> bool {
    worker_columns(board_type).any(|c| c.id == id)
}

/// Whether `id` is the terminal column of a development board.
pub fn is_done_column(id: &str) -> bool {
    column(id).is_some_and(|c| c.kind == ColumnKind::Done)
}

/// The kind of a column.
pub fn kind_of(id: &str) -> Option<ColumnKind> {
    column(id).map(|c| c.kind)
}

/// The status a work item reports while sitting in `id`.
pub fn status_for(id: &str) -> WorkStatus {
    column(id).map_or(WorkStatus::New, |c| c.status)
}
