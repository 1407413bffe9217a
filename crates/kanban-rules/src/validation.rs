//! Move validation: is a relocation or an assignment legal?
//!
//! Relocation is checked in this order, first failure wins:
//! 1. Read-only board -- nothing moves on the Summary board.
//! 2. Same column -- a no-op, always legal.
//! 3. Worker state -- working, transferring, mid-learning, onboarding, on
//!    vacation or fired workers stay put.
//! 4. Worker capability -- the target column's role must be held or learnable.
//! 5. Work items -- only backward drops along the intake table.
//! 6. Worker allow-list -- workers only stand in their board's worker columns.
//!
//! Each check returns `Ok(())` or the [`Rejection`] that stopped it. Callers
//! that only need the yes/no answer use [`can_relocate`] / [`can_assign`].

use kanban_board::topology;
use kanban_types::{BoardType, Feature, Role, Task, Worker, WorkerStatus};
use serde::Serialize;

use crate::labor::WorkItem;

/// Any card that can be dragged on a board.
#[derive(Debug, Clone, Copy)]
pub enum CardRef<'a> {
    /// A worker card.
    Worker(&'a Worker),
    /// A task card.
    Task(&'a Task),
    /// A feature card.
    Feature(&'a Feature),
}

impl<'a> CardRef<'a> {
    /// The card as a labor-carrying item, if it is one.
    pub fn as_work_item(self) -> Option<&'a dyn WorkItem> {
        match self {
            Self::Worker(_) => None,
            Self::Task(task) => Some(task),
            Self::Feature(feature) => Some(feature),
        }
    }
}

/// Why a move or assignment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// Source or target board is read-only.
    ReadOnlyBoard,
    /// Target column is not declared anywhere.
    UnknownColumn,
    /// Target column is not on the requested board.
    WrongBoard,
    /// Worker is bound to a work item.
    WorkerBusy,
    /// Worker's state forbids the operation.
    ///
    /// Onboarding workers are included: relocating one would start a
    /// learning or team-change counter and skip the rest of onboarding.
    WorkerUnavailable(WorkerStatus),
    /// Worker has already spent a day learning in the current column.
    MidLearning,
    /// Worker neither holds nor can learn the required role.
    MissingRole(Role),
    /// Work items only move backward to their column's intake.
    NotBackwardDrop,
    /// Target column is not in the board's worker allow-list.
    NotWorkerColumn,
    /// Only tasks and features can be assigned.
    NotWorkItem,
    /// The item already has an assignee.
    AlreadyAssigned,
    /// The item is neither in the worker's column nor in its intake.
    NoWorkColumn,
}

// ---------------------------------------------------------------------------
// Relocation
// ---------------------------------------------------------------------------

/// Whether `card` may move from `from` to `to` on `target_board`.
pub fn can_relocate(target_board: BoardType, card: CardRef<'_>, from: &str, to: &str) -> bool {
    check_relocation(target_board, card, from, to).is_ok()
}

/// Run the relocation checks.
pub fn check_relocation(
    target_board: BoardType,
    card: CardRef<'_>,
    from: &str,
    to: &str,
) -> Result<(), Rejection> {
    // 1. Read-only boards
    if target_board.is_read_only() || topology::board_of(from).is_some_and(BoardType::is_read_only)
    {
        return Err(Rejection::ReadOnlyBoard);
    }

    match topology::board_of(to) {
        None => return Err(Rejection::UnknownColumn),
        Some(board) if board != target_board => return Err(Rejection::WrongBoard),
        Some(_) => {}
    }

    // 2. No-op
    if from == to {
        return Ok(());
    }

    match card {
        CardRef::Worker(worker) => check_worker_relocation(target_board, worker, to),
        // 5. Work items only drop backward
        CardRef::Task(_) | CardRef::Feature(_) => {
            if topology::is_backward_drop(from, to) {
                Ok(())
            } else {
                Err(Rejection::NotBackwardDrop)
            }
        }
    }
}

fn check_worker_relocation(
    target_board: BoardType,
    worker: &Worker,
    to: &str,
) -> Result<(), Rejection> {
    // 3. Worker state
    if worker.is_working() {
        return Err(Rejection::WorkerBusy);
    }
    match worker.status {
        WorkerStatus::Active => {}
        WorkerStatus::IsLearning if worker.learning_days == 0 => {}
        WorkerStatus::IsLearning => return Err(Rejection::MidLearning),
        other => return Err(Rejection::WorkerUnavailable(other)),
    }

    // 4. Capability
    if let Some(required) = topology::required_role(to)
        && !worker.holds_role(required)
        && !worker.can_learn(required)
    {
        return Err(Rejection::MissingRole(required));
    }

    // 6. Allow-list
    if topology::is_worker_column(target_board, to) {
        Ok(())
    } else {
        Err(Rejection::NotWorkerColumn)
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// The column where `worker` would perform work on an item sitting in
/// `item_column`: the worker's own column when the item is already there or
/// waits in its intake.
pub fn work_column<'w>(item_column: &str, worker: &'w Worker) -> Option<&'w str> {
    let worker_column = worker.card.column_id.as_str();
    if item_column == worker_column || topology::pulls_into(item_column, worker_column) {
        Some(worker_column)
    } else {
        None
    }
}

/// Whether `card` may be assigned to `worker`.
pub fn can_assign(card: CardRef<'_>, worker: &Worker) -> bool {
    check_assignment(card, worker).is_ok()
}

/// Run the assignment checks.
pub fn check_assignment(card: CardRef<'_>, worker: &Worker) -> Result<(), Rejection> {
    let item = card.as_work_item().ok_or(Rejection::NotWorkItem)?;

    if !worker.status.accepts_work() {
        return Err(Rejection::WorkerUnavailable(worker.status));
    }
    if worker.is_working() {
        return Err(Rejection::WorkerBusy);
    }
    if item.assignee().is_some() {
        return Err(Rejection::AlreadyAssigned);
    }

    let column = work_column(&item.card().column_id, worker).ok_or(Rejection::NoWorkColumn)?;
    let required = topology::required_role(column).ok_or(Rejection::NoWorkColumn)?;
    if worker.holds_role(required) {
        Ok(())
    } else {
        Err(Rejection::MissingRole(required))
    }
}
