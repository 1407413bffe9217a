//! The game session: one self-contained simulation instance.
//!
//! A [`Session`] owns every card, the clock, the economy ledger, unlocked
//! achievements, display settings and an outbox of [`SessionEvent`]s. There
//! is no ambient state: tests build as many sessions as they like, and the
//! server wraps exactly one in a [`SessionHandle`].
//!
//! Operations live in sibling modules as further `impl Session` blocks:
//!
//! - [`cards`](crate::cards) -- create, update, delete
//! - [`moves`](crate::moves) -- relocate, assign, unassign
//! - [`staff`](crate::staff) -- vacation, fire, rehire
//! - [`development`](crate::development) -- send to development, settings
//! - [`economy`](crate::economy) -- money and achievements
//! - [`work`](crate::work) -- labor, stage completion, delivery
//! - [`tick`](crate::tick) -- the daily tick
//! - [`seed`](crate::seed) -- initial cards and restart
//!
//! [`SessionHandle`]: crate::handle::SessionHandle

use std::collections::BTreeMap;

use chrono::NaiveDate;
use kanban_ledger::EconomyLedger;
use kanban_rules::{CardRef, RulesConfig, WorkItem};
use kanban_types::{
    Achievement, EntityKind, Feature, FeatureId, Task, TaskId, WorkItemRef, Worker, WorkerId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::GameClock;
use crate::config::KanbanConfig;
use crate::error::SessionError;
use crate::events::SessionEvent;

/// Display toggles shared by every participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether the Summary board is shown.
    pub summary_board_visible: bool,
    /// Whether the ready-for-development column is shown. While hidden,
    /// features reaching it go straight to development.
    pub ready_for_development_visible: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            summary_board_visible: true,
            ready_for_development_visible: true,
        }
    }
}

/// Overview of the game served by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    /// Current day.
    pub day: u64,
    /// Simulated calendar date.
    pub date: NaiveDate,
    /// Company balance.
    pub money: Decimal,
    /// Display settings.
    pub settings: Settings,
    /// Number of workers.
    pub workers: usize,
    /// Number of tasks.
    pub tasks: usize,
    /// Number of features.
    pub features: usize,
    /// Number of ledger entries.
    pub transactions: usize,
    /// Number of unlocked achievements.
    pub achievements: usize,
}

/// One simulation instance.
#[derive(Debug)]
pub struct Session {
    pub(crate) rules: RulesConfig,
    pub(crate) starting_money: Decimal,
    pub(crate) clock: GameClock,
    pub(crate) workers: BTreeMap<WorkerId, Worker>,
    pub(crate) tasks: BTreeMap<TaskId, Task>,
    pub(crate) features: BTreeMap<FeatureId, Feature>,
    pub(crate) ledger: EconomyLedger,
    pub(crate) achievements: BTreeMap<String, Achievement>,
    pub(crate) settings: Settings,
    outbox: Vec<SessionEvent>,
}

impl Session {
    /// Create an empty session on day 1.
    pub fn new(rules: RulesConfig, starting_money: Decimal, start_date: NaiveDate) -> Self {
        Self {
            rules,
            starting_money,
            clock: GameClock::new(start_date),
            workers: BTreeMap::new(),
            tasks: BTreeMap::new(),
            features: BTreeMap::new(),
            ledger: EconomyLedger::new(starting_money),
            achievements: BTreeMap::new(),
            settings: Settings::default(),
            outbox: Vec::new(),
        }
    }

    /// Create an empty session from loaded configuration. `today` is used
    /// when the configuration does not pin a start date.
    pub fn from_config(config: &KanbanConfig, today: NaiveDate) -> Self {
        Self::new(
            config.to_rules(),
            config.game.starting_money,
            config.game.start_date.unwrap_or(today),
        )
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Rule configuration in force.
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Current day.
    pub const fn day(&self) -> u64 {
        self.clock.day()
    }

    /// Simulated calendar date of the current day.
    pub fn current_date(&self) -> Result<NaiveDate, SessionError> {
        Ok(self.clock.current_date()?)
    }

    /// Company balance.
    pub const fn balance(&self) -> Decimal {
        self.ledger.balance()
    }

    /// The economy ledger.
    pub const fn ledger(&self) -> &EconomyLedger {
        &self.ledger
    }

    /// Display settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Look up a worker.
    pub fn worker(&self, id: WorkerId) -> Result<&Worker, SessionError> {
        self.workers.get(&id).ok_or(SessionError::WorkerNotFound(id))
    }

    /// Look up a task.
    pub fn task(&self, id: TaskId) -> Result<&Task, SessionError> {
        self.tasks.get(&id).ok_or(SessionError::TaskNotFound(id))
    }

    /// Look up a feature.
    pub fn feature(&self, id: FeatureId) -> Result<&Feature, SessionError> {
        self.features.get(&id).ok_or(SessionError::FeatureNotFound(id))
    }

    /// Every worker, in creation order.
    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.workers.values()
    }

    /// Every task, in creation order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Every feature, in creation order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Workers standing in `column`, by display order.
    pub fn workers_in(&self, column: &str) -> Vec<&Worker> {
        let mut found: Vec<&Worker> = self
            .workers
            .values()
            .filter(|w| w.card.column_id == column)
            .collect();
        found.sort_by_key(|w| w.card.order);
        found
    }

    /// Tasks sitting in `column`, by display order.
    pub fn tasks_in(&self, column: &str) -> Vec<&Task> {
        let mut found: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.card.column_id == column)
            .collect();
        found.sort_by_key(|t| t.card.order);
        found
    }

    /// Features sitting in `column`, by display order.
    pub fn features_in(&self, column: &str) -> Vec<&Feature> {
        let mut found: Vec<&Feature> = self
            .features
            .values()
            .filter(|f| f.card.column_id == column)
            .collect();
        found.sort_by_key(|f| f.card.order);
        found
    }

    /// Unlocked achievements, by id.
    pub fn achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values()
    }

    /// Kind of the card with this id, if any.
    pub fn kind_of(&self, id: Uuid) -> Option<EntityKind> {
        if self.workers.contains_key(&WorkerId::from(id)) {
            Some(EntityKind::Worker)
        } else if self.tasks.contains_key(&TaskId::from(id)) {
            Some(EntityKind::Task)
        } else if self.features.contains_key(&FeatureId::from(id)) {
            Some(EntityKind::Feature)
        } else {
            None
        }
    }

    /// Overview of the game.
    pub fn status(&self) -> Result<GameStatus, SessionError> {
        Ok(GameStatus {
            day: self.day(),
            date: self.current_date()?,
            money: self.balance(),
            settings: self.settings,
            workers: self.workers.len(),
            tasks: self.tasks.len(),
            features: self.features.len(),
            transactions: self.ledger.len(),
            achievements: self.achievements.len(),
        })
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    pub(crate) fn emit(&mut self, event: SessionEvent) {
        self.outbox.push(event);
    }

    /// Display position for a card entering `column`: after every card
    /// already there.
    pub(crate) fn next_order(&self, column: &str) -> u32 {
        let workers = self.workers.values().filter(|w| w.card.column_id == column).count();
        let tasks = self.tasks.values().filter(|t| t.card.column_id == column).count();
        let features = self.features.values().filter(|f| f.card.column_id == column).count();
        let count = workers.saturating_add(tasks).saturating_add(features);
        u32::try_from(count).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// Any card by id, as seen by the validator.
    pub(crate) fn card_by_id(&self, id: Uuid) -> Result<CardRef<'_>, SessionError> {
        if let Some(worker) = self.workers.get(&WorkerId::from(id)) {
            Ok(CardRef::Worker(worker))
        } else if let Some(task) = self.tasks.get(&TaskId::from(id)) {
            Ok(CardRef::Task(task))
        } else if let Some(feature) = self.features.get(&FeatureId::from(id)) {
            Ok(CardRef::Feature(feature))
        } else {
            Err(SessionError::EntityNotFound(id))
        }
    }

    pub(crate) fn item(&self, item: WorkItemRef) -> Option<&dyn WorkItem> {
        match item {
            WorkItemRef::Task(id) => self.tasks.get(&id).map(|t| t as &dyn WorkItem),
            WorkItemRef::Feature(id) => self.features.get(&id).map(|f| f as &dyn WorkItem),
        }
    }

    pub(crate) fn item_mut(&mut self, item: WorkItemRef) -> Option<&mut dyn WorkItem> {
        match item {
            WorkItemRef::Task(id) => self.tasks.get_mut(&id).map(|t| t as &mut dyn WorkItem),
            WorkItemRef::Feature(id) => self.features.get_mut(&id).map(|f| f as &mut dyn WorkItem),
        }
    }

    /// Release a worker from its item, clearing both sides.
    pub(crate) fn release_worker(&mut self, worker_id: WorkerId) -> Option<WorkItemRef> {
        let item = self.workers.get_mut(&worker_id)?.assignment.take()?;
        self.detach_item(item, worker_id);
        Some(item)
    }

    /// Release an item from its worker, clearing both sides.
    pub(crate) fn release_item(&mut self, item: WorkItemRef) -> Option<WorkerId> {
        let worker_id = self.item_mut(item)?.assignee()?;
        if let Some(worker) = self.workers.get_mut(&worker_id)
            && worker.assignment == Some(item)
        {
            worker.assignment = None;
        }
        self.detach_item(item, worker_id);
        Some(worker_id)
    }

    /// Clear the item side of an assignment whose worker side is already
    /// gone.
    pub(crate) fn detach_item(&mut self, item: WorkItemRef, worker_id: WorkerId) {
        if let Some(target) = self.item_mut(item)
            && target.assignee() == Some(worker_id)
        {
            target.set_assignee(None);
        }
        self.emit(SessionEvent::WorkUnassigned {
            worker: worker_id,
            item,
        });
    }

    /// Remove a task, releasing its worker.
    pub(crate) fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let _ = self.release_item(WorkItemRef::Task(id));
        let task = self.tasks.remove(&id)?;
        self.emit(SessionEvent::EntityDeleted {
            kind: EntityKind::Task,
            id: id.into_inner(),
        });
        Some(task)
    }

    /// Remove a feature together with its generated tasks. Returns the
    /// number of tasks removed, or `None` if the feature does not exist.
    pub(crate) fn remove_feature(&mut self, id: FeatureId) -> Option<u32> {
        let _ = self.release_item(WorkItemRef::Feature(id));
        let feature = self.features.remove(&id)?;
        let removed = feature
            .generated_task_ids
            .iter()
            .filter_map(|task| self.remove_task(*task))
            .count();
        self.emit(SessionEvent::EntityDeleted {
            kind: EntityKind::Feature,
            id: id.into_inner(),
        });
        Some(u32::try_from(removed).unwrap_or(u32::MAX))
    }
}
