//! Worker lifecycle state machine.
//!
//! ```text
//!            hire (onboarding_days > 0)
//!   ──────────────► Onboarding ──(days elapse)──► Active
//!                                                  │  ▲
//!       relocate: learnable role, same board       │  │ role learned / days elapse
//!       ───────────────────────────────────► IsLearning, IsLearningInOtherTeam
//!       relocate: held role, other board           │  │
//!       ───────────────────────────────────► ChangingTeams
//!       start_vacation ────────────────────► OnVacation ──(end date)──► Active
//!       fire (from any state) ─────────────► Fired ──(rehire)──► Active
//! ```
//!
//! Daily transitions (`advance_*`) are no-ops for workers in any other
//! state, so the tick can run every phase over every worker. Explicit
//! commands (`start_vacation`, `end_vacation`, `fire`, `rehire`) return
//! [`RulesError::InvalidTransition`] when the current state forbids them.
//!
//! Releasing the other side of an assignment is the session's job: the
//! commands that drop work report the released item in
//! [`StatusChange::released`].

use chrono::{Days, NaiveDate};
use kanban_board::topology;
use kanban_types::{BoardType, Role, WorkItemRef, Worker, WorkerStatus};
use tracing::debug;

use crate::RulesError;
use crate::config::LifecycleConfig;

/// A state transition applied to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// State before the transition.
    pub from: WorkerStatus,
    /// State after the transition.
    pub to: WorkerStatus,
    /// Work item the worker was bound to and has been released from.
    pub released: Option<WorkItemRef>,
}

impl StatusChange {
    const fn new(from: WorkerStatus, to: WorkerStatus) -> Self {
        Self {
            from,
            to,
            released: None,
        }
    }

    /// Whether the status actually changed.
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// What a day of learning produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningOutcome {
    /// Another day counted toward the role.
    Progressed {
        /// The role being learned.
        role: Role,
        /// Days learned so far.
        days: u32,
    },
    /// The role was acquired; the worker is Active again.
    Learned(Role),
    /// The worker no longer stands where a learnable role is required and
    /// returned to Active without learning.
    Abandoned,
}

fn invalid(worker: &Worker, action: &'static str) -> RulesError {
    RulesError::InvalidTransition {
        worker: worker.id,
        from: worker.status,
        action,
    }
}

// ---------------------------------------------------------------------------
// Hiring and relocation
// ---------------------------------------------------------------------------

/// Put a newly created worker into its starting state.
pub fn start_onboarding(worker: &mut Worker, config: &LifecycleConfig) {
    worker.clear_transient();
    if config.onboarding_days == 0 {
        worker.status = WorkerStatus::Active;
    } else {
        worker.status = WorkerStatus::Onboarding;
        worker.onboarding_days_left = config.onboarding_days;
    }
}

/// Apply the state change caused by dropping `worker` into `to_column` on
/// `target_board`. The move itself must already have been validated.
///
/// The worker's board is updated; the card's column is left to the caller.
pub fn relocate_worker(worker: &mut Worker, target_board: BoardType, to_column: &str) -> StatusChange {
    let from = worker.status;
    let cross_board = target_board != worker.board;
    let origin = worker.board;

    match topology::required_role(to_column) {
        Some(role) if worker.holds_role(role) => {
            worker.learning_role = None;
            worker.learning_days = 0;
            if cross_board {
                worker.previous_board = Some(origin);
                worker.changing_teams_days = 0;
                worker.status = WorkerStatus::ChangingTeams;
            } else {
                worker.status = WorkerStatus::Active;
            }
        }
        Some(role) if worker.can_learn(role) => {
            if worker.learning_role != Some(role) {
                worker.learning_days = 0;
            }
            worker.learning_role = Some(role);
            if cross_board {
                worker.previous_board = Some(origin);
                worker.status = WorkerStatus::IsLearningInOtherTeam;
            } else {
                worker.status = WorkerStatus::IsLearning;
            }
        }
        _ => {
            if matches!(from, WorkerStatus::IsLearning) {
                worker.learning_role = None;
                worker.learning_days = 0;
                worker.status = WorkerStatus::Active;
            }
        }
    }

    worker.board = target_board;
    debug!(worker = %worker.id, ?from, to = ?worker.status, column = to_column, "Worker relocated");
    StatusChange::new(from, worker.status)
}

// ---------------------------------------------------------------------------
// Daily transitions
// ---------------------------------------------------------------------------

/// Recompute the vacation countdown against `today`; at zero the worker
/// returns to Active.
///
/// # Errors
///
/// Returns [`RulesError::CounterOverflow`] if the remaining day count does
/// not fit the counter.
pub fn advance_vacation(worker: &mut Worker, today: NaiveDate) -> Result<Option<StatusChange>, RulesError> {
    if worker.status != WorkerStatus::OnVacation {
        return Ok(None);
    }

    let remaining = worker
        .vacation_end
        .map_or(0, |end| end.signed_duration_since(today).num_days());

    if remaining <= 0 {
        return Ok(Some(finish_vacation(worker)));
    }

    worker.vacation_days_remaining = u32::try_from(remaining).map_err(|_overflow| RulesError::CounterOverflow {
        context: "vacation days remaining",
    })?;
    Ok(None)
}

/// Count one onboarding day; at zero the worker becomes Active.
pub fn advance_onboarding(worker: &mut Worker) -> Option<StatusChange> {
    if worker.status != WorkerStatus::Onboarding {
        return None;
    }
    worker.onboarding_days_left = worker.onboarding_days_left.saturating_sub(1);
    if worker.onboarding_days_left > 0 {
        return None;
    }
    worker.status = WorkerStatus::Active;
    Some(StatusChange::new(WorkerStatus::Onboarding, WorkerStatus::Active))
}

/// Count one learning day for a worker in either learning state.
///
/// A worker learning on its own board must still stand in a column whose
/// required role it can learn; otherwise learning is abandoned. A worker
/// learning in another team is not checked against its column.
///
/// # Errors
///
/// Returns [`RulesError::CounterOverflow`] if the day counter overflows.
pub fn advance_learning(
    worker: &mut Worker,
    config: &LifecycleConfig,
) -> Result<Option<LearningOutcome>, RulesError> {
    let role = match worker.status {
        WorkerStatus::IsLearning => {
            match topology::required_role(&worker.card.column_id) {
                Some(required) if worker.can_learn(required) => {
                    if worker.learning_role.is_some_and(|current| current != required) {
                        worker.learning_days = 0;
                    }
                    worker.learning_role = Some(required);
                    required
                }
                _ => return Ok(Some(abandon_learning(worker))),
            }
        }
        WorkerStatus::IsLearningInOtherTeam => match worker.learning_role {
            Some(role) => role,
            None => return Ok(Some(abandon_learning(worker))),
        },
        _ => return Ok(None),
    };

    let days = worker
        .learning_days
        .checked_add(1)
        .ok_or(RulesError::CounterOverflow {
            context: "learning days",
        })?;
    worker.learning_days = days;

    if days < config.days_to_learn_role {
        return Ok(Some(LearningOutcome::Progressed { role, days }));
    }

    worker.learnable_roles.remove(&role);
    worker.learned_roles.insert(role);
    worker.learning_role = None;
    worker.learning_days = 0;
    worker.previous_board = None;
    worker.status = WorkerStatus::Active;
    debug!(worker = %worker.id, ?role, "Role learned");
    Ok(Some(LearningOutcome::Learned(role)))
}

fn abandon_learning(worker: &mut Worker) -> LearningOutcome {
    worker.learning_role = None;
    worker.learning_days = 0;
    worker.previous_board = None;
    worker.status = WorkerStatus::Active;
    LearningOutcome::Abandoned
}

/// Count one team-change day; once the configured period elapses the
/// worker becomes Active on its new board.
///
/// # Errors
///
/// Returns [`RulesError::CounterOverflow`] if the day counter overflows.
pub fn advance_team_change(
    worker: &mut Worker,
    config: &LifecycleConfig,
) -> Result<Option<StatusChange>, RulesError> {
    if worker.status != WorkerStatus::ChangingTeams {
        return Ok(None);
    }

    worker.changing_teams_days = worker
        .changing_teams_days
        .checked_add(1)
        .ok_or(RulesError::CounterOverflow {
            context: "team change days",
        })?;

    if worker.changing_teams_days < config.days_to_change_teams {
        return Ok(None);
    }

    worker.changing_teams_days = 0;
    worker.previous_board = None;
    worker.status = WorkerStatus::Active;
    Ok(Some(StatusChange::new(WorkerStatus::ChangingTeams, WorkerStatus::Active)))
}

// ---------------------------------------------------------------------------
// Explicit commands
// ---------------------------------------------------------------------------

/// Send an Active worker on vacation for `days` days starting `today`.
/// Any assignment is released.
///
/// # Errors
///
/// Returns [`RulesError::InvalidTransition`] unless the worker is Active,
/// [`RulesError::InvalidVacationLength`] for zero days and
/// [`RulesError::DateOutOfRange`] if the end date overflows the calendar.
pub fn start_vacation(worker: &mut Worker, today: NaiveDate, days: u32) -> Result<StatusChange, RulesError> {
    if worker.status != WorkerStatus::Active {
        return Err(invalid(worker, "start vacation"));
    }
    if days == 0 {
        return Err(RulesError::InvalidVacationLength { days });
    }
    let end = today
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or(RulesError::DateOutOfRange {
            context: "vacation end date",
        })?;

    let released = worker.assignment.take();
    worker.vacation_start = Some(today);
    worker.vacation_end = Some(end);
    worker.vacation_days_remaining = days;
    worker.status = WorkerStatus::OnVacation;

    Ok(StatusChange {
        from: WorkerStatus::Active,
        to: WorkerStatus::OnVacation,
        released,
    })
}

/// Bring a worker back from vacation early.
///
/// # Errors
///
/// Returns [`RulesError::InvalidTransition`] unless the worker is on vacation.
pub fn end_vacation(worker: &mut Worker) -> Result<StatusChange, RulesError> {
    if worker.status != WorkerStatus::OnVacation {
        return Err(invalid(worker, "end vacation"));
    }
    Ok(finish_vacation(worker))
}

fn finish_vacation(worker: &mut Worker) -> StatusChange {
    worker.vacation_start = None;
    worker.vacation_end = None;
    worker.vacation_days_remaining = 0;
    worker.status = WorkerStatus::Active;
    StatusChange::new(WorkerStatus::OnVacation, WorkerStatus::Active)
}

/// Fire a worker. Any assignment is released and every transient field is
/// cleared.
///
/// # Errors
///
/// Returns [`RulesError::InvalidTransition`] if the worker is already fired.
pub fn fire(worker: &mut Worker) -> Result<StatusChange, RulesError> {
    if worker.status == WorkerStatus::Fired {
        return Err(invalid(worker, "fire"));
    }
    let from = worker.status;
    let released = worker.assignment.take();
    worker.clear_transient();
    worker.status = WorkerStatus::Fired;
    Ok(StatusChange {
        from,
        to: WorkerStatus::Fired,
        released,
    })
}

/// Bring a fired worker back as Active.
///
/// # Errors
///
/// Returns [`RulesError::InvalidTransition`] unless the worker is fired.
pub fn rehire(worker: &mut Worker) -> Result<StatusChange, RulesError> {
    if worker.status != WorkerStatus::Fired {
        return Err(invalid(worker, "rehire"));
    }
    worker.clear_transient();
    worker.status = WorkerStatus::Active;
    Ok(StatusChange::new(WorkerStatus::Fired, WorkerStatus::Active))
}
