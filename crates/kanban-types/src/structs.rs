//! Core entity structs for the Kanban workflow simulation.
//!
//! Every card on a board (worker, task, feature) embeds a [`Card`] carrying
//! the shared positional fields. The economy ledger records
//! [`MoneyTransaction`] values and delivery unlocks [`Achievement`]s.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::enums::{
    AchievementType, BoardType, EntityKind, Priority, Role, Seniority, TransactionType,
    WorkStatus, WorkerStatus,
};
use crate::ids::{FeatureId, TaskId, TransactionId, WorkerId};

// ---------------------------------------------------------------------------
// Card base
// ---------------------------------------------------------------------------

/// Fields shared by every card placed on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Card {
    /// Display title (a worker's name, a task's summary).
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Column the card currently sits in. Column ids are unique across boards.
    pub column_id: String,
    /// Position within the column, ascending.
    pub order: u32,
    /// When the card was created.
    pub created_at: DateTime<Utc>,
    /// When the card was last modified.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Create a card in the given column at position zero.
    pub fn new(title: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            column_id: column_id.into(),
            order: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Stamp the modification time.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Reference to a task or feature, the only cards that carry labor.
///
/// A worker holds at most one of these, so a worker can never be bound to a
/// task and a feature at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "id")]
#[ts(export, export_to = "bindings/")]
pub enum WorkItemRef {
    /// A task.
    Task(TaskId),
    /// A feature.
    Feature(FeatureId),
}

impl WorkItemRef {
    /// The raw identifier of the referenced item.
    pub const fn uuid(self) -> Uuid {
        match self {
            Self::Task(id) => id.0,
            Self::Feature(id) => id.0,
        }
    }

    /// Which kind of card is referenced.
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Task(_) => EntityKind::Task,
            Self::Feature(_) => EntityKind::Feature,
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// A worker card.
///
/// Learned and learnable roles are disjoint: completing a learning period
/// moves a role from `learnable_roles` into `learned_roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Worker {
    /// Unique identifier.
    pub id: WorkerId,
    /// Shared card fields. `title` is the worker's name.
    #[serde(flatten)]
    pub card: Card,
    /// Contact address, informational.
    pub email: String,
    /// Board the worker currently belongs to.
    pub board: BoardType,
    /// Roles the worker can perform.
    pub learned_roles: BTreeSet<Role>,
    /// Roles the worker is able to acquire.
    pub learnable_roles: BTreeSet<Role>,
    /// Seniority tier.
    pub seniority: Seniority,
    /// Lifecycle state.
    pub status: WorkerStatus,
    /// The item this worker is bound to, if any.
    pub assignment: Option<WorkItemRef>,
    /// Role being learned while in a learning state.
    pub learning_role: Option<Role>,
    /// Days spent learning `learning_role`.
    pub learning_days: u32,
    /// Days spent changing teams.
    pub changing_teams_days: u32,
    /// Days of onboarding still to serve.
    pub onboarding_days_left: u32,
    /// Board the worker came from when changing teams or learning elsewhere.
    pub previous_board: Option<BoardType>,
    /// First day of the current vacation.
    pub vacation_start: Option<NaiveDate>,
    /// Day the current vacation ends.
    pub vacation_end: Option<NaiveDate>,
    /// Vacation days still to serve, recomputed each day.
    pub vacation_days_remaining: u32,
}

impl Worker {
    /// Whether the worker is bound to a work item.
    pub const fn is_working(&self) -> bool {
        self.assignment.is_some()
    }

    /// Whether any learned role satisfies `required`.
    pub fn holds_role(&self, required: Role) -> bool {
        self.learned_roles.iter().any(|held| held.covers(required))
    }

    /// Whether `required` can be acquired by learning.
    pub fn can_learn(&self, required: Role) -> bool {
        !self.holds_role(required) && self.learnable_roles.contains(&required)
    }

    /// Clear every transient lifecycle field: counters, learning target,
    /// previous board and vacation dates.
    pub fn clear_transient(&mut self) {
        self.learning_role = None;
        self.learning_days = 0;
        self.changing_teams_days = 0;
        self.onboarding_days_left = 0;
        self.previous_board = None;
        self.vacation_start = None;
        self.vacation_end = None;
        self.vacation_days_remaining = 0;
    }
}

// ---------------------------------------------------------------------------
// Work items
// ---------------------------------------------------------------------------

/// A task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// Shared card fields.
    #[serde(flatten)]
    pub card: Card,
    /// Business priority.
    pub priority: Priority,
    /// Progress status, derived from the column.
    pub status: WorkStatus,
    /// Worker bound to this task, if any.
    pub assignee: Option<WorkerId>,
    /// Labor required to finish one stage.
    #[ts(as = "String")]
    pub labor_intensity: Decimal,
    /// Labor still outstanding in the current stage.
    #[ts(as = "String")]
    pub labor_left: Decimal,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Informational estimate.
    pub estimated_hours: u32,
    /// Feature that generated this task, if any.
    pub parent_feature_id: Option<FeatureId>,
    /// Task that should be finished first.
    pub depends_on_task_id: Option<TaskId>,
    /// Whether `depends_on_task_id` is finished (or gone).
    pub dependency_satisfied: bool,
}

/// A feature card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Feature {
    /// Unique identifier.
    pub id: FeatureId,
    /// Shared card fields.
    #[serde(flatten)]
    pub card: Card,
    /// Business priority.
    pub priority: Priority,
    /// Progress status, derived from the column.
    pub status: WorkStatus,
    /// Worker bound to this feature, if any.
    pub assignee: Option<WorkerId>,
    /// Labor required to finish one stage.
    #[ts(as = "String")]
    pub labor_intensity: Decimal,
    /// Labor still outstanding in the current stage.
    #[ts(as = "String")]
    pub labor_left: Decimal,
    /// Deadline. An undelivered feature is removed once this date arrives.
    pub due_date: Option<NaiveDate>,
    /// Size estimate; drives how many tasks development generates.
    pub story_points: u32,
    /// Money credited on delivery.
    #[ts(as = "String")]
    pub profit: Decimal,
    /// Tasks synthesized when the feature was sent to development.
    pub generated_task_ids: Vec<TaskId>,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// One immutable entry in the economy ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoneyTransaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Simulated day the transaction was recorded on.
    pub day: u64,
    /// Income or expense.
    pub kind: TransactionType,
    /// Always strictly positive; the direction lives in `kind`.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Human-readable reason.
    pub description: String,
    /// Wall-clock time of recording.
    pub created_at: DateTime<Utc>,
}

/// An unlocked achievement. Unique by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Achievement {
    /// Stable identifier, e.g. `first-delivery`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Icon name for the UI.
    pub icon: String,
    /// Category.
    pub achievement_type: AchievementType,
    /// Simulated day of unlock.
    pub unlocked_day: u64,
    /// Wall-clock time of unlock.
    pub unlocked_at: DateTime<Utc>,
}
