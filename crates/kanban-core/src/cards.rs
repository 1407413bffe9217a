//! Creating, editing and deleting cards.
//!
//! Edits never move a card: column changes go through
//! [`Session::relocate`] and [`Session::assign`] so that every move is
//! validated. Editing a work item's labor intensity clamps the outstanding
//! labor so it never exceeds the new intensity.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use kanban_board::columns::BACKLOG;
use kanban_board::topology;
use kanban_rules::lifecycle;
use kanban_types::{
    BoardType, Card, EntityKind, Feature, FeatureId, Priority, Role, Seniority, Task, TaskId,
    Worker, WorkerId, WorkerStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::Session;

/// Profit credited per story point when a feature is created without an
/// explicit profit.
pub const PROFIT_PER_STORY_POINT: i64 = 500;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A worker to hire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewWorker {
    /// Display name.
    pub name: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Board to hire onto.
    pub board: BoardType,
    /// Worker column to start in.
    pub column_id: String,
    /// Roles already held.
    #[serde(default)]
    pub learned_roles: BTreeSet<Role>,
    /// Roles that can be learned. Roles already held are dropped.
    #[serde(default)]
    pub learnable_roles: BTreeSet<Role>,
    /// Seniority tier (default: junior).
    #[serde(default)]
    pub seniority: Option<Seniority>,
}

/// A task to create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    /// Display title.
    pub title: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Column to place the task in (any non-summary column).
    pub column_id: String,
    /// Business priority.
    #[serde(default)]
    pub priority: Priority,
    /// Labor per stage (default: 1).
    #[serde(default)]
    pub labor_intensity: Option<Decimal>,
    /// Optional deadline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Informational estimate.
    #[serde(default)]
    pub estimated_hours: u32,
}

/// A feature to create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewFeature {
    /// Display title.
    pub title: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Analysis-board column to place the feature in (default: backlog).
    #[serde(default)]
    pub column_id: Option<String>,
    /// Business priority.
    #[serde(default)]
    pub priority: Priority,
    /// Labor per stage (default: 1).
    #[serde(default)]
    pub labor_intensity: Option<Decimal>,
    /// Deadline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Size estimate.
    #[serde(default)]
    pub story_points: u32,
    /// Money credited on delivery (default: 500 per story point).
    #[serde(default)]
    pub profit: Option<Decimal>,
}

/// Fields of a worker that may be edited. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkerUpdate {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New seniority.
    #[serde(default)]
    pub seniority: Option<Seniority>,
    /// Replacement set of held roles.
    #[serde(default)]
    pub learned_roles: Option<BTreeSet<Role>>,
    /// Replacement set of learnable roles.
    #[serde(default)]
    pub learnable_roles: Option<BTreeSet<Role>>,
}

/// Fields of a task that may be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskUpdate {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// New deadline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// New estimate.
    #[serde(default)]
    pub estimated_hours: Option<u32>,
    /// New labor per stage.
    #[serde(default)]
    pub labor_intensity: Option<Decimal>,
}

/// Fields of a feature that may be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeatureUpdate {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// New deadline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// New size estimate.
    #[serde(default)]
    pub story_points: Option<u32>,
    /// New profit.
    #[serde(default)]
    pub profit: Option<Decimal>,
    /// New labor per stage.
    #[serde(default)]
    pub labor_intensity: Option<Decimal>,
}

fn require_title(title: &str, kind: &str) -> Result<(), SessionError> {
    if title.trim().is_empty() {
        return Err(SessionError::InvalidRequest(format!("{kind} title must not be empty")));
    }
    Ok(())
}

fn positive_intensity(value: Option<Decimal>) -> Result<Decimal, SessionError> {
    let intensity = value.unwrap_or(Decimal::ONE);
    if intensity <= Decimal::ZERO {
        return Err(SessionError::InvalidRequest(format!(
            "labor intensity must be positive, got {intensity}"
        )));
    }
    Ok(intensity)
}

fn non_negative_profit(profit: Decimal) -> Result<Decimal, SessionError> {
    if profit.is_sign_negative() && !profit.is_zero() {
        return Err(SessionError::InvalidRequest(format!(
            "profit must not be negative, got {profit}"
        )));
    }
    Ok(profit)
}

/// Default profit for a feature of `story_points` points.
pub fn default_profit(story_points: u32) -> Decimal {
    Decimal::from(story_points).saturating_mul(Decimal::from(PROFIT_PER_STORY_POINT))
}

impl Session {
    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Hire a worker. The worker starts onboarding unless onboarding is
    /// configured to zero days.
    pub fn create_worker(&mut self, request: NewWorker) -> Result<WorkerId, SessionError> {
        require_title(&request.name, "worker")?;
        topology::require_column_on(&request.column_id, request.board)?;
        if !topology::is_worker_column(request.board, &request.column_id) {
            return Err(SessionError::InvalidRequest(format!(
                "column {} does not accept workers",
                request.column_id
            )));
        }

        let mut card = Card::new(request.name, request.column_id);
        card.order = self.next_order(&card.column_id);
        let learnable = request
            .learnable_roles
            .difference(&request.learned_roles)
            .copied()
            .collect();

        let mut worker = Worker {
            id: WorkerId::new(),
            card,
            email: request.email,
            board: request.board,
            learned_roles: request.learned_roles,
            learnable_roles: learnable,
            seniority: request.seniority.unwrap_or(Seniority::Junior),
            status: WorkerStatus::Onboarding,
            assignment: None,
            learning_role: None,
            learning_days: 0,
            changing_teams_days: 0,
            onboarding_days_left: 0,
            previous_board: None,
            vacation_start: None,
            vacation_end: None,
            vacation_days_remaining: 0,
        };
        lifecycle::start_onboarding(&mut worker, &self.rules.lifecycle);

        let id = worker.id;
        debug!(worker = %id, status = ?worker.status, "Worker hired");
        self.workers.insert(id, worker);
        self.emit(SessionEvent::EntityCreated {
            kind: EntityKind::Worker,
            id: id.into_inner(),
        });
        Ok(id)
    }

    /// Create a task on any development or analysis column.
    pub fn create_task(&mut self, request: NewTask) -> Result<TaskId, SessionError> {
        require_title(&request.title, "task")?;
        let column = topology::require_column(&request.column_id)?;
        if topology::board_of(column.id).is_some_and(BoardType::is_read_only) {
            return Err(SessionError::InvalidRequest(format!(
                "tasks cannot be placed on read-only column {}",
                column.id
            )));
        }
        let intensity = positive_intensity(request.labor_intensity)?;

        let mut card = Card::new(request.title, column.id);
        card.description = request.description;
        card.order = self.next_order(column.id);

        let task = Task {
            id: TaskId::new(),
            card,
            priority: request.priority,
            status: column.status,
            assignee: None,
            labor_intensity: intensity,
            labor_left: intensity,
            due_date: request.due_date,
            estimated_hours: request.estimated_hours,
            parent_feature_id: None,
            depends_on_task_id: None,
            dependency_satisfied: true,
        };
        let id = task.id;
        self.tasks.insert(id, task);
        self.emit(SessionEvent::EntityCreated {
            kind: EntityKind::Task,
            id: id.into_inner(),
        });
        Ok(id)
    }

    /// Create a feature on the Analysis board.
    pub fn create_feature(&mut self, request: NewFeature) -> Result<FeatureId, SessionError> {
        require_title(&request.title, "feature")?;
        let column_id = request.column_id.as_deref().unwrap_or(BACKLOG);
        let column = topology::require_column_on(column_id, BoardType::Analysis)?;
        let intensity = positive_intensity(request.labor_intensity)?;
        let profit = non_negative_profit(
            request
                .profit
                .unwrap_or_else(|| default_profit(request.story_points)),
        )?;

        let mut card = Card::new(request.title, column.id);
        card.description = request.description;
        card.order = self.next_order(column.id);

        let feature = Feature {
            id: FeatureId::new(),
            card,
            priority: request.priority,
            status: column.status,
            assignee: None,
            labor_intensity: intensity,
            labor_left: intensity,
            due_date: request.due_date,
            story_points: request.story_points,
            profit,
            generated_task_ids: Vec::new(),
        };
        let id = feature.id;
        self.features.insert(id, feature);
        self.emit(SessionEvent::EntityCreated {
            kind: EntityKind::Feature,
            id: id.into_inner(),
        });
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Edit a worker's descriptive fields and role sets.
    pub fn update_worker(&mut self, id: WorkerId, update: WorkerUpdate) -> Result<&Worker, SessionError> {
        if let Some(name) = &update.name {
            require_title(name, "worker")?;
        }
        let worker = self.workers.get_mut(&id).ok_or(SessionError::WorkerNotFound(id))?;

        if let Some(name) = update.name {
            worker.card.title = name;
        }
        if let Some(email) = update.email {
            worker.email = email;
        }
        if let Some(seniority) = update.seniority {
            worker.seniority = seniority;
        }
        if let Some(learned) = update.learned_roles {
            worker.learned_roles = learned;
        }
        if let Some(learnable) = update.learnable_roles {
            worker.learnable_roles = learnable;
        }
        let held = worker.learned_roles.clone();
        worker.learnable_roles.retain(|role| !held.contains(role));
        worker.card.touch();

        self.emit(SessionEvent::EntityUpdated {
            kind: EntityKind::Worker,
            id: id.into_inner(),
        });
        self.worker(id)
    }

    /// Edit a task's descriptive fields.
    pub fn update_task(&mut self, id: TaskId, update: TaskUpdate) -> Result<&Task, SessionError> {
        if let Some(title) = &update.title {
            require_title(title, "task")?;
        }
        let intensity = update
            .labor_intensity
            .map(|value| positive_intensity(Some(value)))
            .transpose()?;
        let task = self.tasks.get_mut(&id).ok_or(SessionError::TaskNotFound(id))?;

        if let Some(title) = update.title {
            task.card.title = title;
        }
        if let Some(description) = update.description {
            task.card.description = description;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(due) = update.due_date {
            task.due_date = Some(due);
        }
        if let Some(hours) = update.estimated_hours {
            task.estimated_hours = hours;
        }
        if let Some(intensity) = intensity {
            task.labor_intensity = intensity;
            task.labor_left = task.labor_left.min(intensity);
        }
        task.card.touch();

        self.emit(SessionEvent::EntityUpdated {
            kind: EntityKind::Task,
            id: id.into_inner(),
        });
        self.task(id)
    }

    /// Edit a feature's descriptive fields.
    pub fn update_feature(&mut self, id: FeatureId, update: FeatureUpdate) -> Result<&Feature, SessionError> {
        if let Some(title) = &update.title {
            require_title(title, "feature")?;
        }
        let intensity = update
            .labor_intensity
            .map(|value| positive_intensity(Some(value)))
            .transpose()?;
        let profit = update.profit.map(non_negative_profit).transpose()?;
        let feature = self.features.get_mut(&id).ok_or(SessionError::FeatureNotFound(id))?;

        if let Some(title) = update.title {
            feature.card.title = title;
        }
        if let Some(description) = update.description {
            feature.card.description = description;
        }
        if let Some(priority) = update.priority {
            feature.priority = priority;
        }
        if let Some(due) = update.due_date {
            feature.due_date = Some(due);
        }
        if let Some(points) = update.story_points {
            feature.story_points = points;
        }
        if let Some(profit) = profit {
            feature.profit = profit;
        }
        if let Some(intensity) = intensity {
            feature.labor_intensity = intensity;
            feature.labor_left = feature.labor_left.min(intensity);
        }
        feature.card.touch();

        self.emit(SessionEvent::EntityUpdated {
            kind: EntityKind::Feature,
            id: id.into_inner(),
        });
        self.feature(id)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Remove a worker, releasing its work item.
    pub fn delete_worker(&mut self, id: WorkerId) -> Result<(), SessionError> {
        self.worker(id)?;
        let _ = self.release_worker(id);
        self.workers.remove(&id);
        self.emit(SessionEvent::EntityDeleted {
            kind: EntityKind::Worker,
            id: id.into_inner(),
        });
        Ok(())
    }

    /// Remove a task, releasing its worker. Tasks that depended on it
    /// become satisfied.
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), SessionError> {
        self.remove_task(id).ok_or(SessionError::TaskNotFound(id))?;
        self.refresh_dependencies();
        Ok(())
    }

    /// Remove a feature together with every task generated from it.
    pub fn delete_feature(&mut self, id: FeatureId) -> Result<(), SessionError> {
        self.remove_feature(id).ok_or(SessionError::FeatureNotFound(id))?;
        self.refresh_dependencies();
        Ok(())
    }
}
