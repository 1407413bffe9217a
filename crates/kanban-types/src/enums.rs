//! Enumeration types for the Kanban workflow simulation.
//!
//! Boards, roles, worker states, work-item statuses and the small tags used
//! by the economy ledger and achievements.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Boards and columns
// ---------------------------------------------------------------------------

/// One of the fixed workflow boards.
///
/// `Summary` is a read-only projection: features in development and
/// delivered features live there, and no participant may drag cards
/// within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BoardType {
    /// Feature analysis pipeline.
    Analysis,
    /// Backend development pipeline.
    Backend,
    /// Frontend development pipeline.
    Frontend,
    /// Read-only overview of features in development and delivered.
    Summary,
}

impl BoardType {
    /// Every board in display order.
    pub const ALL: [Self; 4] = [Self::Analysis, Self::Backend, Self::Frontend, Self::Summary];

    /// Whether participants are forbidden from relocating cards on this board.
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Summary)
    }
}

/// The stage a column represents within its board.
///
/// Work status of a card is derived from the kind of the column it sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ColumnKind {
    /// Unstarted work.
    Backlog,
    /// Workers stand here and reduce labor on assigned items.
    Doing,
    /// Finished a stage, waiting to be pulled into the next one.
    Waiting,
    /// Analysis finished; feature can be sent to development.
    ReadyForDevelopment,
    /// Feature whose child tasks are being built.
    Development,
    /// Terminal column of a development board.
    Done,
    /// Terminal column for delivered features.
    Delivered,
}

// ---------------------------------------------------------------------------
// Workers
// ---------------------------------------------------------------------------

/// A capability a worker may hold or learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Ordinary analysis.
    Analyst,
    /// High-level analysis. Also satisfies ordinary analysis.
    HighLevelAnalyst,
    /// Implementation work.
    Developer,
    /// Verification work.
    Tester,
}

impl Role {
    /// Every role.
    pub const ALL: [Self; 4] = [
        Self::Analyst,
        Self::HighLevelAnalyst,
        Self::Developer,
        Self::Tester,
    ];

    /// Whether holding `self` satisfies a column that requires `required`.
    pub const fn covers(self, required: Self) -> bool {
        matches!(
            (self, required),
            (Self::Analyst, Self::Analyst)
                | (Self::HighLevelAnalyst, Self::HighLevelAnalyst | Self::Analyst)
                | (Self::Developer, Self::Developer)
                | (Self::Tester, Self::Tester)
        )
    }
}

/// Seniority tier, used to look up labor efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Seniority {
    /// Junior worker.
    Junior,
    /// Mid-level worker.
    Mid,
    /// Senior worker.
    Senior,
}

/// Lifecycle state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WorkerStatus {
    /// Available for assignments.
    Active,
    /// Newly hired, unavailable until onboarding lapses.
    Onboarding,
    /// Learning the role of a column on the same board.
    IsLearning,
    /// Learning the role of a column on a different board.
    IsLearningInOtherTeam,
    /// Moved to another board with a role already held.
    ChangingTeams,
    /// On leave until the vacation end date.
    OnVacation,
    /// Terminated. Frozen until rehired.
    Fired,
}

impl WorkerStatus {
    /// Whether a worker in this state may take a new assignment.
    pub const fn accepts_work(self) -> bool {
        matches!(self, Self::Active)
    }
}

// ---------------------------------------------------------------------------
// Work items
// ---------------------------------------------------------------------------

/// Progress status of a task or feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WorkStatus {
    /// Created, never placed on a stage.
    New,
    /// Waiting in a backlog.
    ToDo,
    /// Being worked in a doing column.
    InProgress,
    /// Between stages.
    Waiting,
    /// Being worked in a test column.
    Testing,
    /// Reached a terminal column.
    Done,
    /// Removed from play.
    Cancelled,
}

/// Business priority of a work item.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Priority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
}

/// Kind of card an entity id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// A worker card.
    Worker,
    /// A task card.
    Task,
    /// A feature card.
    Feature,
}

// ---------------------------------------------------------------------------
// Economy and achievements
// ---------------------------------------------------------------------------

/// Direction of a money transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

/// Category of an unlocked achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AchievementType {
    /// Earned within a single day.
    Daily,
    /// Earned by reaching a goal.
    Milestone,
    /// One-off.
    Special,
}
