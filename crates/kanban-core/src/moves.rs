//! Relocation and assignment.
//!
//! Both operations ask the validator first and answer `Ok(false)` when the
//! move is illegal; nothing changes in that case. An `Err` means the ids did
//! not resolve.

use kanban_board::topology;
use kanban_rules::{CardRef, WorkItem, enter_column, lifecycle, validation};
use kanban_types::{BoardType, EntityKind, FeatureId, TaskId, WorkItemRef, WorkerId};
use tracing::debug;
use uuid::Uuid;

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::Session;

impl Session {
    /// Drag the card `id` onto `to_column` of `board`.
    ///
    /// Workers change lifecycle state according to the role the target
    /// column requires. Work items only move backward; they lose their
    /// assignee and restart the labor of the column they enter.
    pub fn relocate(&mut self, id: Uuid, board: BoardType, to_column: &str) -> Result<bool, SessionError> {
        match self.kind_of(id).ok_or(SessionError::EntityNotFound(id))? {
            EntityKind::Worker => self.relocate_worker(WorkerId::from(id), board, to_column),
            EntityKind::Task => self.relocate_item(WorkItemRef::Task(TaskId::from(id)), board, to_column),
            EntityKind::Feature => {
                self.relocate_item(WorkItemRef::Feature(FeatureId::from(id)), board, to_column)
            }
        }
    }

    fn relocate_worker(&mut self, id: WorkerId, board: BoardType, to_column: &str) -> Result<bool, SessionError> {
        let worker = self.worker(id)?;
        let from = worker.card.column_id.clone();
        if let Err(rejection) = validation::check_relocation(board, CardRef::Worker(worker), &from, to_column) {
            debug!(worker = %id, ?rejection, from = %from, to = to_column, "Relocation rejected");
            return Ok(false);
        }
        if from == to_column {
            return Ok(true);
        }

        let _ = self.release_worker(id);
        let order = self.next_order(to_column);
        let worker = self.workers.get_mut(&id).ok_or(SessionError::WorkerNotFound(id))?;
        let change = lifecycle::relocate_worker(worker, board, to_column);
        to_column.clone_into(&mut worker.card.column_id);
        worker.card.order = order;
        worker.card.touch();

        self.emit(SessionEvent::EntityRelocated {
            kind: EntityKind::Worker,
            id: id.into_inner(),
            from,
            to: to_column.to_owned(),
        });
        if change.is_change() {
            self.emit(SessionEvent::WorkerStatusChanged {
                worker: id,
                from: change.from,
                to: change.to,
            });
        }
        Ok(true)
    }

    fn relocate_item(&mut self, item: WorkItemRef, board: BoardType, to_column: &str) -> Result<bool, SessionError> {
        let card = self.card_by_id(item.uuid())?;
        let from = card
            .as_work_item()
            .map(|w| w.card().column_id.clone())
            .ok_or(SessionError::EntityNotFound(item.uuid()))?;
        if let Err(rejection) = validation::check_relocation(board, card, &from, to_column) {
            debug!(?item, ?rejection, from = %from, to = to_column, "Relocation rejected");
            return Ok(false);
        }
        if from == to_column {
            return Ok(true);
        }

        let _ = self.release_item(item);
        let order = self.next_order(to_column);
        let target = self.item_mut(item).ok_or(SessionError::EntityNotFound(item.uuid()))?;
        enter_column(target, to_column, order);

        self.emit(SessionEvent::EntityRelocated {
            kind: item.kind(),
            id: item.uuid(),
            from,
            to: to_column.to_owned(),
        });
        self.refresh_dependencies();
        Ok(true)
    }

    /// Bind the work item `item_id` to `worker_id`.
    ///
    /// An item waiting in the intake of the worker's column is pulled into
    /// that column and its labor restarts.
    pub fn assign(&mut self, item_id: Uuid, worker_id: WorkerId) -> Result<bool, SessionError> {
        let worker = self.worker(worker_id)?;
        let card = self.card_by_id(item_id)?;
        if let Err(rejection) = validation::check_assignment(card, worker) {
            debug!(worker = %worker_id, item = %item_id, ?rejection, "Assignment rejected");
            return Ok(false);
        }

        let Some(item) = card.as_work_item() else {
            return Ok(false);
        };
        let reference = item.reference();
        let from = item.card().column_id.clone();
        let Some(work_column) = validation::work_column(&from, worker).map(str::to_owned) else {
            return Ok(false);
        };

        if from != work_column {
            let order = self.next_order(&work_column);
            let target = self.item_mut(reference).ok_or(SessionError::EntityNotFound(item_id))?;
            enter_column(target, &work_column, order);
            self.emit(SessionEvent::EntityRelocated {
                kind: reference.kind(),
                id: item_id,
                from,
                to: work_column.clone(),
            });
        }

        if let Some(target) = self.item_mut(reference) {
            target.set_assignee(Some(worker_id));
            target.set_status(topology::status_for(&work_column));
        }
        if let Some(worker) = self.workers.get_mut(&worker_id) {
            worker.assignment = Some(reference);
        }
        self.emit(SessionEvent::WorkAssigned {
            worker: worker_id,
            item: reference,
        });
        Ok(true)
    }

    /// Release a worker from its work item. Returns whether anything was
    /// released.
    pub fn unassign(&mut self, worker_id: WorkerId) -> Result<bool, SessionError> {
        self.worker(worker_id)?;
        Ok(self.release_worker(worker_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use kanban_board::columns::{ANALYSIS_1, ANALYSIS_2, BACKLOG, WAITING};
    use kanban_rules::{LifecycleConfig, RulesConfig};
    use kanban_types::{Priority, Role, WorkerStatus};
    use rust_decimal::Decimal;

    use super::*;
    use crate::cards::{NewFeature, NewWorker};

    fn session() -> Session {
        let rules = RulesConfig {
            lifecycle: LifecycleConfig {
                onboarding_days: 0,
                ..LifecycleConfig::default()
            },
            ..RulesConfig::default()
        };
        Session::new(
            rules,
            Decimal::new(10_000, 0),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default(),
        )
    }

    fn hire(s: &mut Session, column: &str, learned: &[Role], learnable: &[Role]) -> WorkerId {
        s.create_worker(NewWorker {
            name: "Alex Turner".to_owned(),
            email: String::new(),
            board: topology::board_of(column).unwrap_or(BoardType::Analysis),
            column_id: column.to_owned(),
            learned_roles: learned.iter().copied().collect::<BTreeSet<_>>(),
            learnable_roles: learnable.iter().copied().collect::<BTreeSet<_>>(),
            seniority: None,
        })
        .unwrap_or_default()
    }

    fn feature(s: &mut Session, column: &str) -> FeatureId {
        s.create_feature(NewFeature {
            title: "Checkout".to_owned(),
            description: String::new(),
            column_id: Some(column.to_owned()),
            priority: Priority::High,
            labor_intensity: Some(Decimal::new(2, 0)),
            due_date: None,
            story_points: 8,
            profit: None,
        })
        .unwrap_or_default()
    }

    #[test]
    fn assign_pulls_item_into_worker_column() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        let item = feature(&mut s, BACKLOG);

        assert_eq!(s.assign(item.into_inner(), worker).ok(), Some(true));
        let f = s.feature(item).ok();
        assert_eq!(f.map(|f| f.card.column_id.as_str()), Some(ANALYSIS_1));
        assert_eq!(f.and_then(|f| f.assignee), Some(worker));
        assert_eq!(
            s.worker(worker).ok().and_then(|w| w.assignment),
            Some(WorkItemRef::Feature(item))
        );
    }

    #[test]
    fn second_assignment_is_rejected() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        let first = feature(&mut s, BACKLOG);
        let second = feature(&mut s, BACKLOG);

        assert_eq!(s.assign(first.into_inner(), worker).ok(), Some(true));
        assert_eq!(s.assign(second.into_inner(), worker).ok(), Some(false));
        assert_eq!(s.feature(second).ok().and_then(|f| f.assignee), None);
    }

    #[test]
    fn assigning_a_worker_card_is_rejected() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        let other = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        assert_eq!(s.assign(other.into_inner(), worker).ok(), Some(false));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        assert!(matches!(
            s.assign(Uuid::nil(), worker),
            Err(SessionError::EntityNotFound(_))
        ));
        assert!(matches!(
            s.relocate(Uuid::nil(), BoardType::Analysis, BACKLOG),
            Err(SessionError::EntityNotFound(_))
        ));
        assert!(matches!(s.unassign(WorkerId::new()), Err(SessionError::WorkerNotFound(_))));
    }

    #[test]
    fn backward_drop_releases_worker_and_resets_labor() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        let item = feature(&mut s, BACKLOG);
        assert_eq!(s.assign(item.into_inner(), worker).ok(), Some(true));
        if let Some(f) = s.features.get_mut(&item) {
            f.labor_left = Decimal::ONE;
        }

        assert_eq!(
            s.relocate(item.into_inner(), BoardType::Analysis, BACKLOG).ok(),
            Some(true)
        );
        let f = s.feature(item).ok();
        assert_eq!(f.map(|f| f.card.column_id.as_str()), Some(BACKLOG));
        assert_eq!(f.map(|f| f.labor_left), Some(Decimal::new(2, 0)));
        assert_eq!(f.and_then(|f| f.assignee), None);
        assert_eq!(s.worker(worker).ok().and_then(|w| w.assignment), None);
    }

    #[test]
    fn forward_drag_is_rejected_without_change() {
        let mut s = session();
        let item = feature(&mut s, WAITING);
        let _ = s.drain_events();
        assert_eq!(
            s.relocate(item.into_inner(), BoardType::Analysis, ANALYSIS_2).ok(),
            Some(false)
        );
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn worker_relocation_into_learnable_column() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[Role::HighLevelAnalyst]);
        assert_eq!(
            s.relocate(worker.into_inner(), BoardType::Analysis, ANALYSIS_2).ok(),
            Some(true)
        );
        let w = s.worker(worker).ok();
        assert_eq!(w.map(|w| w.status), Some(WorkerStatus::IsLearning));
        assert_eq!(w.map(|w| w.card.column_id.as_str()), Some(ANALYSIS_2));
    }

    #[test]
    fn worker_relocation_across_boards() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        assert_eq!(
            s.relocate(worker.into_inner(), BoardType::Backend, "backend-analysis").ok(),
            Some(true)
        );
        let w = s.worker(worker).ok();
        assert_eq!(w.map(|w| w.status), Some(WorkerStatus::ChangingTeams));
        assert_eq!(w.map(|w| w.board), Some(BoardType::Backend));
    }

    #[test]
    fn summary_board_rejects_everything() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        assert_eq!(
            s.relocate(worker.into_inner(), BoardType::Summary, "delivered").ok(),
            Some(false)
        );
    }

    #[test]
    fn unassign_reports_whether_anything_was_released() {
        let mut s = session();
        let worker = hire(&mut s, ANALYSIS_1, &[Role::Analyst], &[]);
        let item = feature(&mut s, BACKLOG);
        assert_eq!(s.unassign(worker).ok(), Some(false));
        assert_eq!(s.assign(item.into_inner(), worker).ok(), Some(true));
        assert_eq!(s.unassign(worker).ok(), Some(true));
        assert_eq!(s.feature(item).ok().and_then(|f| f.assignee), None);
    }
}
