//! Sending analysed features to development, and the display settings that
//! can trigger it.

use std::collections::BTreeMap;

use kanban_board::columns::{DEVELOPMENT, READY_FOR_DEVELOPMENT};
use kanban_rules::{enter_column, plan_development};
use kanban_types::{BoardType, Card, EntityKind, FeatureId, Task, TaskId, WorkStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::{Session, Settings};

/// Estimated hours stamped on every generated task.
pub const GENERATED_TASK_HOURS: u32 = 8;

/// Partial update of the display settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SettingsUpdate {
    /// New Summary board visibility.
    #[serde(default)]
    pub summary_board_visible: Option<bool>,
    /// New ready-for-development column visibility.
    #[serde(default)]
    pub ready_for_development_visible: Option<bool>,
}

impl Session {
    /// Move a feature from `ready-dev` to `development` and generate its
    /// backend and frontend tasks.
    ///
    /// # Errors
    ///
    /// [`SessionError::FeatureNotFound`] for an unknown id, and
    /// [`SessionError::IllegalState`] unless the feature waits in the ready
    /// column without tasks or an assignee.
    pub fn send_to_development(&mut self, id: FeatureId) -> Result<Vec<TaskId>, SessionError> {
        let feature = self.feature(id)?;
        if feature.card.column_id != READY_FOR_DEVELOPMENT {
            return Err(SessionError::IllegalState(format!(
                "feature {id} is in {}, not {READY_FOR_DEVELOPMENT}",
                feature.card.column_id
            )));
        }
        if !feature.generated_task_ids.is_empty() {
            return Err(SessionError::IllegalState(format!(
                "feature {id} already has development tasks"
            )));
        }
        if feature.assignee.is_some() {
            return Err(SessionError::IllegalState(format!("feature {id} is assigned")));
        }

        let plan = plan_development(&feature.card.title, feature.story_points, &self.rules.decomposition);
        let due_date = feature.due_date;
        let priority = feature.priority;

        let mut created = Vec::with_capacity(plan.len());
        let mut last_on_board: BTreeMap<BoardType, TaskId> = BTreeMap::new();
        for planned in plan {
            let order = self.next_order(planned.column);
            let depends_on = if planned.depends_on_previous {
                last_on_board.get(&planned.board).copied()
            } else {
                None
            };
            let mut card = Card::new(&planned.title, planned.column);
            card.order = order;
            let task = Task {
                id: TaskId::new(),
                card,
                priority,
                status: WorkStatus::ToDo,
                assignee: None,
                labor_intensity: Decimal::ONE,
                labor_left: Decimal::ONE,
                due_date,
                estimated_hours: GENERATED_TASK_HOURS,
                parent_feature_id: Some(id),
                depends_on_task_id: depends_on,
                dependency_satisfied: depends_on.is_none(),
            };
            last_on_board.insert(planned.board, task.id);
            created.push(task.id);
            self.emit(SessionEvent::EntityCreated {
                kind: EntityKind::Task,
                id: task.id.into_inner(),
            });
            self.tasks.insert(task.id, task);
        }

        let order = self.next_order(DEVELOPMENT);
        let feature = self.features.get_mut(&id).ok_or(SessionError::FeatureNotFound(id))?;
        enter_column(feature, DEVELOPMENT, order);
        feature.generated_task_ids.clone_from(&created);

        info!(feature = %id, tasks = created.len(), "Feature sent to development");
        self.emit(SessionEvent::EntityRelocated {
            kind: EntityKind::Feature,
            id: id.into_inner(),
            from: READY_FOR_DEVELOPMENT.to_owned(),
            to: DEVELOPMENT.to_owned(),
        });
        self.emit(SessionEvent::FeatureSentToDevelopment {
            feature: id,
            tasks: created.clone(),
        });
        Ok(created)
    }

    /// Change the display settings.
    ///
    /// Hiding the ready-for-development column sends every feature waiting
    /// there to development.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Settings {
        if let Some(visible) = update.summary_board_visible {
            self.settings.summary_board_visible = visible;
        }
        if let Some(visible) = update.ready_for_development_visible {
            self.settings.ready_for_development_visible = visible;
        }

        if !self.settings.ready_for_development_visible {
            let waiting: Vec<FeatureId> = self
                .features
                .values()
                .filter(|f| {
                    f.card.column_id == READY_FOR_DEVELOPMENT
                        && f.generated_task_ids.is_empty()
                        && f.assignee.is_none()
                })
                .map(|f| f.id)
                .collect();
            for feature in waiting {
                if let Err(e) = self.send_to_development(feature) {
                    warn!(%feature, error = %e, "Could not flush feature to development");
                }
            }
        }

        let settings = self.settings;
        self.emit(SessionEvent::SettingsChanged { settings });
        settings
    }
}
