//! The daily tick.
//!
//! [`Session::advance_day`] runs every phase to completion for all entities
//! before starting the next:
//!
//! 1. Advance the day counter.
//! 2. Vacation.
//! 3. Onboarding.
//! 4. Learning.
//! 5. Team change.
//! 6. Deadlines.
//! 7. Work.
//! 8. Delivery and dependency refresh.
//! 9. Ledger reconciliation.
//!
//! A failure on one entity is logged and recorded in the [`TickSummary`];
//! it never aborts the phase or the day.

use chrono::NaiveDate;
use kanban_board::columns::DELIVERED;
use kanban_ledger::ReconcileResult;
use kanban_rules::{LearningOutcome, RulesConfig, RulesError, StatusChange, lifecycle};
use kanban_types::{FeatureId, Role, Worker, WorkerId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::Session;

/// A role acquired during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearnedRole {
    /// The worker.
    pub worker: WorkerId,
    /// The role.
    pub role: Role,
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The new day.
    pub day: u64,
    /// Simulated date of the new day.
    pub date: NaiveDate,
    /// Automatic worker status transitions.
    pub status_changes: u32,
    /// Roles acquired.
    pub roles_learned: Vec<LearnedRole>,
    /// Work items that finished a stage.
    pub stages_completed: u32,
    /// Features sent to development because the ready column is hidden.
    pub features_sent: Vec<FeatureId>,
    /// Features that missed their deadline and were removed.
    pub features_expired: Vec<FeatureId>,
    /// Features delivered.
    pub features_delivered: Vec<FeatureId>,
    /// Profit credited by deliveries.
    pub income: Decimal,
    /// Per-entity failures that were skipped.
    pub errors: Vec<String>,
}

impl TickSummary {
    /// An empty summary for `day`.
    pub const fn new(day: u64, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            status_changes: 0,
            roles_learned: Vec::new(),
            stages_completed: 0,
            features_sent: Vec::new(),
            features_expired: Vec::new(),
            features_delivered: Vec::new(),
            income: Decimal::ZERO,
            errors: Vec::new(),
        }
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Record a ledger mismatch found at the end of the day.
    fn record_reconciliation(&mut self, result: ReconcileResult) {
        if let ReconcileResult::Anomaly(anomaly) = result {
            warn!(
                day = self.day,
                expected = %anomaly.expected,
                actual = %anomaly.actual,
                "Ledger out of balance"
            );
            self.record_error(format!("ledger: {anomaly}"));
        }
    }
}

impl Session {
    /// Advance the simulation by one day.
    ///
    /// # Errors
    ///
    /// [`SessionError::Clock`] if the day counter or the calendar would
    /// overflow. Nothing else aborts a tick.
    pub fn advance_day(&mut self) -> Result<TickSummary, SessionError> {
        // Phase 1
        let day = self.clock.advance()?;
        let date = self.current_date()?;
        info!(day, %date, "Day started");
        self.emit(SessionEvent::DayAdvanced { day, date });
        let mut summary = TickSummary::new(day, date);

        // Phase 2
        self.for_each_worker(&mut summary, "vacation", |worker, _| {
            lifecycle::advance_vacation(worker, date)
        });

        // Phase 3
        self.for_each_worker(&mut summary, "onboarding", |worker, _| {
            Ok(lifecycle::advance_onboarding(worker))
        });

        // Phase 4
        self.run_learning_phase(&mut summary);

        // Phase 5
        self.for_each_worker(&mut summary, "team change", |worker, rules| {
            lifecycle::advance_team_change(worker, &rules.lifecycle)
        });

        // Phase 6
        self.expire_features(date, &mut summary);

        // Phase 7
        self.run_work_phase(&mut summary);

        // Phase 8
        self.deliver_features(&mut summary);
        self.refresh_dependencies();

        // Phase 9
        summary.record_reconciliation(self.ledger.reconcile());

        info!(
            day,
            stages = summary.stages_completed,
            delivered = summary.features_delivered.len(),
            expired = summary.features_expired.len(),
            errors = summary.errors.len(),
            "Day complete"
        );
        Ok(summary)
    }

    /// Apply a per-worker transition to every worker, emitting status
    /// changes and recording failures.
    fn for_each_worker<F>(&mut self, summary: &mut TickSummary, phase: &'static str, mut step: F)
    where
        F: FnMut(&mut Worker, &RulesConfig) -> Result<Option<StatusChange>, RulesError>,
    {
        let ids: Vec<WorkerId> = self.workers.keys().copied().collect();
        for id in ids {
            let Some(worker) = self.workers.get_mut(&id) else {
                continue;
            };
            match step(worker, &self.rules) {
                Ok(Some(change)) if change.is_change() => {
                    debug!(worker = %id, phase, from = ?change.from, to = ?change.to, "Status changed");
                    summary.status_changes = summary.status_changes.saturating_add(1);
                    self.emit(SessionEvent::WorkerStatusChanged {
                        worker: id,
                        from: change.from,
                        to: change.to,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(worker = %id, phase, error = %e, "Worker transition failed");
                    summary.record_error(format!("{phase} for worker {id}: {e}"));
                }
            }
        }
    }

    fn run_learning_phase(&mut self, summary: &mut TickSummary) {
        let ids: Vec<WorkerId> = self.workers.keys().copied().collect();
        for id in ids {
            let Some(worker) = self.workers.get_mut(&id) else {
                continue;
            };
            let from = worker.status;
            match lifecycle::advance_learning(worker, &self.rules.lifecycle) {
                Ok(Some(LearningOutcome::Learned(role))) => {
                    info!(worker = %id, ?role, "Role learned");
                    let to = worker.status;
                    summary.status_changes = summary.status_changes.saturating_add(1);
                    summary.roles_learned.push(LearnedRole { worker: id, role });
                    self.emit(SessionEvent::RoleLearned { worker: id, role });
                    self.emit(SessionEvent::WorkerStatusChanged { worker: id, from, to });
                }
                Ok(Some(LearningOutcome::Abandoned)) => {
                    let to = worker.status;
                    summary.status_changes = summary.status_changes.saturating_add(1);
                    self.emit(SessionEvent::WorkerStatusChanged { worker: id, from, to });
                }
                Ok(Some(LearningOutcome::Progressed { .. }) | None) => {}
                Err(e) => {
                    warn!(worker = %id, error = %e, "Learning failed");
                    summary.record_error(format!("learning for worker {id}: {e}"));
                }
            }
        }
    }

    /// Remove every undelivered feature whose due date has arrived.
    fn expire_features(&mut self, date: NaiveDate, summary: &mut TickSummary) {
        let overdue: Vec<FeatureId> = self
            .features
            .values()
            .filter(|f| f.card.column_id != DELIVERED && f.due_date.is_some_and(|due| due <= date))
            .map(|f| f.id)
            .collect();

        for id in overdue {
            let Some(tasks_removed) = self.remove_feature(id) else {
                continue;
            };
            info!(feature = %id, tasks_removed, "Feature expired");
            summary.features_expired.push(id);
            self.emit(SessionEvent::FeatureExpired {
                feature: id,
                tasks_removed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use kanban_board::columns::{ANALYSIS_1, ANALYSIS_2, BACKLOG, READY_FOR_DEVELOPMENT};
    use kanban_ledger::LedgerAnomaly;
    use kanban_types::{BoardType, Priority, Seniority, WorkerStatus};

    use super::*;
    use crate::cards::{NewFeature, NewWorker};

    fn session() -> Session {
        Session::new(
            RulesConfig::default(),
            Decimal::new(10_000, 0),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default(),
        )
    }

    fn hire(s: &mut Session, learnable: &[Role]) -> WorkerId {
        s.create_worker(NewWorker {
            name: "Jack Thompson".to_owned(),
            email: String::new(),
            board: BoardType::Analysis,
            column_id: ANALYSIS_1.to_owned(),
            learned_roles: BTreeSet::from([Role::Analyst]),
            learnable_roles: learnable.iter().copied().collect(),
            seniority: Some(Seniority::Junior),
        })
        .unwrap_or_default()
    }

    fn feature(s: &mut Session, column: &str, due: Option<NaiveDate>) -> FeatureId {
        s.create_feature(NewFeature {
            title: "Email Notifications".to_owned(),
            description: String::new(),
            column_id: Some(column.to_owned()),
            priority: Priority::Low,
            labor_intensity: None,
            due_date: due,
            story_points: 5,
            profit: None,
        })
        .unwrap_or_default()
    }

    #[test]
    fn tick_advances_day_and_date() {
        let mut s = session();
        let summary = s.advance_day().ok();
        assert_eq!(summary.as_ref().map(|t| t.day), Some(2));
        assert_eq!(summary.map(|t| t.date), NaiveDate::from_ymd_opt(2026, 9, 2));
        assert_eq!(s.day(), 2);
    }

    #[test]
    fn onboarding_finishes_after_three_days() {
        let mut s = session();
        let worker = hire(&mut s, &[]);
        assert_eq!(s.worker(worker).ok().map(|w| w.status), Some(WorkerStatus::Onboarding));

        let _ = s.advance_day();
        let _ = s.advance_day();
        assert_eq!(s.worker(worker).ok().map(|w| w.status), Some(WorkerStatus::Onboarding));
        let summary = s.advance_day().ok();
        assert_eq!(s.worker(worker).ok().map(|w| w.status), Some(WorkerStatus::Active));
        assert_eq!(summary.map(|t| t.status_changes), Some(1));
    }

    #[test]
    fn learning_completes_after_configured_days() {
        let mut s = session();
        let worker = hire(&mut s, &[Role::HighLevelAnalyst]);
        for _ in 0..3 {
            let _ = s.advance_day();
        }
        assert_eq!(
            s.relocate(worker.into_inner(), BoardType::Analysis, ANALYSIS_2).ok(),
            Some(true)
        );

        for _ in 0..7 {
            let _ = s.advance_day();
        }
        assert_eq!(s.worker(worker).ok().map(|w| w.status), Some(WorkerStatus::IsLearning));

        let summary = s.advance_day().ok();
        let w = s.worker(worker).ok();
        assert_eq!(w.map(|w| w.status), Some(WorkerStatus::Active));
        assert!(w.is_some_and(|w| w.holds_role(Role::HighLevelAnalyst)));
        assert_eq!(
            summary.map(|t| t.roles_learned),
            Some(vec![LearnedRole {
                worker,
                role: Role::HighLevelAnalyst
            }])
        );
    }

    #[test]
    fn vacation_ends_on_its_last_day() {
        let mut s = session();
        let worker = hire(&mut s, &[]);
        for _ in 0..3 {
            let _ = s.advance_day();
        }
        let _ = s.start_vacation(worker, 2);

        let _ = s.advance_day();
        assert_eq!(s.worker(worker).ok().map(|w| w.status), Some(WorkerStatus::OnVacation));
        let _ = s.advance_day();
        assert_eq!(s.worker(worker).ok().map(|w| w.status), Some(WorkerStatus::Active));
    }

    #[test]
    fn overdue_features_expire_with_their_tasks() {
        let mut s = session();
        let due = NaiveDate::from_ymd_opt(2026, 9, 2);
        let expiring = feature(&mut s, READY_FOR_DEVELOPMENT, due);
        let safe = feature(&mut s, BACKLOG, NaiveDate::from_ymd_opt(2026, 9, 20));
        let tasks = s.send_to_development(expiring).unwrap_or_default();
        assert!(!tasks.is_empty());
        let money = s.balance();

        let summary = s.advance_day().ok();
        assert_eq!(summary.map(|t| t.features_expired), Some(vec![expiring]));
        assert!(s.feature(expiring).is_err());
        assert!(s.feature(safe).is_ok());
        assert_eq!(s.tasks().count(), 0);
        assert_eq!(s.balance(), money);
    }

    #[test]
    fn delivered_features_do_not_expire() {
        let mut s = session();
        let id = feature(&mut s, BACKLOG, NaiveDate::from_ymd_opt(2026, 9, 2));
        if let Some(f) = s.features.get_mut(&id) {
            DELIVERED.clone_into(&mut f.card.column_id);
        }
        let summary = s.advance_day().ok();
        assert_eq!(summary.map(|t| t.features_expired.len()), Some(0));
        assert!(s.feature(id).is_ok());
    }

    #[test]
    fn ledger_mismatch_is_recorded_not_fatal() {
        let mut summary = TickSummary::new(3, NaiveDate::from_ymd_opt(2026, 9, 3).unwrap_or_default());
        summary.record_reconciliation(ReconcileResult::Balanced);
        assert!(summary.errors.is_empty());

        summary.record_reconciliation(ReconcileResult::Anomaly(LedgerAnomaly {
            expected: Decimal::new(10_000, 0),
            actual: Decimal::new(9_000, 0),
            message: "balance mismatch: log implies 10000, stored 9000".to_owned(),
        }));
        assert_eq!(
            summary.errors,
            vec!["ledger: balance mismatch: log implies 10000, stored 9000".to_owned()]
        );
    }

    #[test]
    fn money_overrides_keep_the_day_balanced() {
        let mut s = session();
        let _ = s.add_money(Decimal::new(250, 0), None);
        let _ = s.set_money(Decimal::new(42, 0));
        let _ = s.add_money(Decimal::new(8, 0), None);
        let summary = s.advance_day().ok();
        assert_eq!(summary.map(|t| t.errors), Some(Vec::new()));
        assert_eq!(s.balance(), Decimal::new(50, 0));
    }
}
