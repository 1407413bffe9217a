//! The work phase: labor, stage completion, dependency flags and feature
//! delivery.

use kanban_board::columns::{DELIVERED, DEVELOPMENT, READY_FOR_DEVELOPMENT};
use kanban_board::topology;
use kanban_rules::{WorkItem, advance_work, efficiency, enter_column};
use kanban_types::{
    AchievementType, EntityKind, FeatureId, Seniority, TaskId, WorkItemRef, WorkerId, WorkerStatus,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::events::SessionEvent;
use crate::session::Session;
use crate::tick::TickSummary;

impl Session {
    /// Every Active worker with an assignment applies one unit of labor.
    pub(crate) fn run_work_phase(&mut self, summary: &mut TickSummary) {
        let working: Vec<(WorkerId, WorkItemRef, Seniority)> = self
            .workers
            .values()
            .filter(|w| w.status == WorkerStatus::Active)
            .filter_map(|w| w.assignment.map(|item| (w.id, item, w.seniority)))
            .collect();

        for (worker_id, item, seniority) in working {
            let rate = efficiency(&self.rules.efficiency, seniority);
            let Some(target) = self.item_mut(item) else {
                warn!(worker = %worker_id, ?item, "Assignment points at a missing item, clearing it");
                if let Some(worker) = self.workers.get_mut(&worker_id) {
                    worker.assignment = None;
                }
                summary.record_error(format!("worker {worker_id} was assigned to a missing item"));
                continue;
            };
            let progress = advance_work(target, rate);
            debug!(worker = %worker_id, ?item, left = %progress.labor_left, "Labor applied");
            if progress.completed {
                self.complete_stage(item, summary);
            }
        }
    }

    /// Move a finished item to the next column of its board.
    ///
    /// An item in the last column of its board is released and stays put.
    pub(crate) fn complete_stage(&mut self, item: WorkItemRef, summary: &mut TickSummary) {
        let _ = self.release_item(item);
        let Some(from) = self.item(item).map(|i| i.card().column_id.clone()) else {
            return;
        };
        let next = topology::next_column(&from);
        if let Some(next) = next {
            let order = self.next_order(next);
            if let Some(target) = self.item_mut(item) {
                enter_column(target, next, order);
            }
        }

        summary.stages_completed = summary.stages_completed.saturating_add(1);
        self.emit(SessionEvent::StageCompleted {
            item,
            from,
            to: next.map(str::to_owned),
        });

        if let (WorkItemRef::Feature(feature), Some(READY_FOR_DEVELOPMENT)) = (item, next)
            && !self.settings.ready_for_development_visible
        {
            match self.send_to_development(feature) {
                Ok(_) => summary.features_sent.push(feature),
                Err(e) => {
                    warn!(%feature, error = %e, "Automatic send to development failed");
                    summary.record_error(format!("feature {feature}: {e}"));
                }
            }
        }
    }

    /// Recompute `dependency_satisfied` for every task with a predecessor.
    ///
    /// A predecessor that no longer exists counts as satisfied.
    pub(crate) fn refresh_dependencies(&mut self) {
        let flips: Vec<(TaskId, bool)> = self
            .tasks
            .values()
            .filter_map(|task| {
                let predecessor = task.depends_on_task_id?;
                let satisfied = self
                    .tasks
                    .get(&predecessor)
                    .is_none_or(|p| topology::is_done_column(&p.card.column_id));
                (satisfied != task.dependency_satisfied).then_some((task.id, satisfied))
            })
            .collect();

        for (id, satisfied) in flips {
            if let Some(task) = self.tasks.get_mut(&id) {
                task.dependency_satisfied = satisfied;
            }
            self.emit(SessionEvent::EntityUpdated {
                kind: EntityKind::Task,
                id: id.into_inner(),
            });
        }
    }

    /// Deliver every feature in development whose generated tasks are all
    /// done. Missing tasks count as done.
    pub(crate) fn deliver_features(&mut self, summary: &mut TickSummary) {
        let ready: Vec<FeatureId> = self
            .features
            .values()
            .filter(|f| f.card.column_id == DEVELOPMENT && !f.generated_task_ids.is_empty())
            .filter(|f| {
                f.generated_task_ids.iter().all(|id| {
                    self.tasks
                        .get(id)
                        .is_none_or(|t| topology::is_done_column(&t.card.column_id))
                })
            })
            .map(|f| f.id)
            .collect();

        for feature in ready {
            match self.deliver_feature(feature) {
                Some(profit) => {
                    summary.income = summary.income.saturating_add(profit);
                    summary.features_delivered.push(feature);
                }
                None => summary.record_error(format!("feature {feature} could not be delivered")),
            }
        }
    }

    /// Returns the profit credited, or `None` if the feature vanished.
    fn deliver_feature(&mut self, id: FeatureId) -> Option<Decimal> {
        let _ = self.release_item(WorkItemRef::Feature(id));
        let order = self.next_order(DELIVERED);
        let feature = self.features.get_mut(&id)?;
        enter_column(feature, DELIVERED, order);
        let tasks = std::mem::take(&mut feature.generated_task_ids);
        let profit = feature.profit;
        let title = feature.card.title.clone();

        self.emit(SessionEvent::EntityRelocated {
            kind: EntityKind::Feature,
            id: id.into_inner(),
            from: DEVELOPMENT.to_owned(),
            to: DELIVERED.to_owned(),
        });
        for task in tasks {
            let _ = self.remove_task(task);
        }

        let mut credited = Decimal::ZERO;
        if profit > Decimal::ZERO {
            let day = self.day();
            let recorded = self
                .ledger
                .record_income(day, profit, &format!("Feature completed: {title}"))
                .map(|_| ());
            match recorded {
                Ok(_) => {
                    credited = profit;
                    self.emit(SessionEvent::MoneyChanged {
                        balance: self.ledger.balance(),
                    });
                }
                Err(e) => warn!(feature = %id, error = %e, "Profit could not be credited"),
            }
        }

        self.unlock_achievement(
            format!("feature-delivered-{id}"),
            format!("Delivered: {title}"),
            format!("Delivered the feature \"{title}\""),
            AchievementType::Milestone,
        );
        self.unlock_achievement(
            "first-delivery".to_owned(),
            "First Delivery".to_owned(),
            "Delivered the first feature to customers".to_owned(),
            AchievementType::Special,
        );

        info!(feature = %id, %title, profit = %credited, "Feature delivered");
        self.emit(SessionEvent::FeatureDelivered {
            feature: id,
            profit: credited,
        });
        Some(credited)
    }
}
