//! Outbound session events.
//!
//! Every mutation of a [`Session`] records one or more [`SessionEvent`]
//! values in the session's outbox. The [`SessionHandle`] drains the outbox
//! after the mutation is committed and the lock released, then hands each
//! event to an [`EventSink`].
//!
//! [`Session`]: crate::session::Session
//! [`SessionHandle`]: crate::handle::SessionHandle

use chrono::NaiveDate;
use kanban_types::{
    Achievement, EntityKind, FeatureId, Role, TaskId, WorkItemRef, WorkerId, WorkerStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::session::Settings;

/// A change to the game, as seen by connected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new day began.
    DayAdvanced {
        /// The new day number.
        day: u64,
        /// Simulated calendar date of the new day.
        date: NaiveDate,
    },
    /// A card was created.
    EntityCreated {
        /// Card kind.
        kind: EntityKind,
        /// Card id.
        id: Uuid,
    },
    /// A card's fields changed.
    EntityUpdated {
        /// Card kind.
        kind: EntityKind,
        /// Card id.
        id: Uuid,
    },
    /// A card was removed.
    EntityDeleted {
        /// Card kind.
        kind: EntityKind,
        /// Card id.
        id: Uuid,
    },
    /// A card moved between columns.
    EntityRelocated {
        /// Card kind.
        kind: EntityKind,
        /// Card id.
        id: Uuid,
        /// Column the card left.
        from: String,
        /// Column the card entered.
        to: String,
    },
    /// A worker was bound to a work item.
    WorkAssigned {
        /// The worker.
        worker: WorkerId,
        /// The item.
        item: WorkItemRef,
    },
    /// A worker was released from a work item.
    WorkUnassigned {
        /// The worker.
        worker: WorkerId,
        /// The item.
        item: WorkItemRef,
    },
    /// A work item finished the labor of its current column.
    StageCompleted {
        /// The item.
        item: WorkItemRef,
        /// Column where the stage was completed.
        from: String,
        /// Column the item advanced to, if the board has a next column.
        to: Option<String>,
    },
    /// A feature entered development and its tasks were generated.
    FeatureSentToDevelopment {
        /// The feature.
        feature: FeatureId,
        /// The generated tasks.
        tasks: Vec<TaskId>,
    },
    /// Every generated task was done; the feature was delivered.
    FeatureDelivered {
        /// The feature.
        feature: FeatureId,
        /// Profit credited.
        profit: Decimal,
    },
    /// A feature missed its deadline and was removed with its tasks.
    FeatureExpired {
        /// The feature.
        feature: FeatureId,
        /// Number of generated tasks removed with it.
        tasks_removed: u32,
    },
    /// A worker's lifecycle state changed.
    WorkerStatusChanged {
        /// The worker.
        worker: WorkerId,
        /// Previous state.
        from: WorkerStatus,
        /// New state.
        to: WorkerStatus,
    },
    /// A worker finished learning a role.
    RoleLearned {
        /// The worker.
        worker: WorkerId,
        /// The role acquired.
        role: Role,
    },
    /// The company balance changed.
    MoneyChanged {
        /// New balance.
        balance: Decimal,
    },
    /// An achievement was unlocked.
    AchievementUnlocked {
        /// The achievement.
        achievement: Achievement,
    },
    /// Display settings changed.
    SettingsChanged {
        /// The new settings.
        settings: Settings,
    },
    /// The game was restarted from scratch.
    GameRestarted {
        /// Day after the restart.
        day: u64,
    },
}

/// Receiver of committed session events.
///
/// Implementations must not block: they are called from async request
/// handlers after the session lock has been released.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn publish(&self, event: &SessionEvent);
}

/// A sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn publish(&self, _event: &SessionEvent) {}
}

impl EventSink for broadcast::Sender<SessionEvent> {
    fn publish(&self, event: &SessionEvent) {
        // send fails only when there are no receivers, which is normal
        // when no client is connected.
        let _ = self.send(event.clone());
    }
}
