//! Labor primitives shared by tasks and features.
//!
//! A work item carries `labor_intensity` (labor per stage) and `labor_left`
//! (labor outstanding in the current stage). Each day an assigned worker
//! removes labor equal to their efficiency; at zero the stage is complete.
//! Entering any column resets `labor_left` to the full intensity.
//!
//! Applying a completed stage (unassigning, moving to the next column) needs
//! both sides of the assignment, so it lives in the session; this module only
//! owns the arithmetic and the column-entry bookkeeping.

use kanban_board::topology;
use kanban_types::{Card, Feature, Task, WorkItemRef, WorkStatus, WorkerId};
use rust_decimal::Decimal;

use crate::config::EfficiencyTable;

/// Common view over the two card kinds that carry labor.
pub trait WorkItem {
    /// Reference to this item.
    fn reference(&self) -> WorkItemRef;
    /// Shared card fields.
    fn card(&self) -> &Card;
    /// Shared card fields, mutable.
    fn card_mut(&mut self) -> &mut Card;
    /// Labor required per stage.
    fn labor_intensity(&self) -> Decimal;
    /// Labor outstanding in the current stage.
    fn labor_left(&self) -> Decimal;
    /// Overwrite the outstanding labor.
    fn set_labor_left(&mut self, left: Decimal);
    /// Overwrite the status.
    fn set_status(&mut self, status: WorkStatus);
    /// Worker bound to this item.
    fn assignee(&self) -> Option<WorkerId>;
    /// Bind or release a worker.
    fn set_assignee(&mut self, worker: Option<WorkerId>);
}

macro_rules! impl_work_item {
    ($ty:ty, $variant:ident) => {
        impl WorkItem for $ty {
            fn reference(&self) -> WorkItemRef {
                WorkItemRef::$variant(self.id)
            }
            fn card(&self) -> &Card {
                &self.card
            }
            fn card_mut(&mut self) -> &mut Card {
                &mut self.card
            }
            fn labor_intensity(&self) -> Decimal {
                self.labor_intensity
            }
            fn labor_left(&self) -> Decimal {
                self.labor_left
            }
            fn set_labor_left(&mut self, left: Decimal) {
                self.labor_left = left;
            }
            fn set_status(&mut self, status: WorkStatus) {
                self.status = status;
            }
            fn assignee(&self) -> Option<WorkerId> {
                self.assignee
            }
            fn set_assignee(&mut self, worker: Option<WorkerId>) {
                self.assignee = worker;
            }
        }
    };
}

impl_work_item!(Task, Task);
impl_work_item!(Feature, Feature);

/// Result of one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaborProgress {
    /// Labor outstanding after the work.
    pub labor_left: Decimal,
    /// Whether the current stage is finished.
    pub completed: bool,
}

/// Efficiency of a worker of the given seniority.
pub const fn efficiency(
    table: &EfficiencyTable,
    seniority: kanban_types::Seniority,
) -> Decimal {
    table.for_seniority(seniority)
}

/// Remove `efficiency` labor from the item, flooring at zero.
///
/// A non-positive efficiency makes no progress.
pub fn advance_work<W: WorkItem + ?Sized>(item: &mut W, efficiency: Decimal) -> LaborProgress {
    let current = item.labor_left().max(Decimal::ZERO);
    let left = if efficiency > Decimal::ZERO {
        current.saturating_sub(efficiency).max(Decimal::ZERO)
    } else {
        current
    };
    item.set_labor_left(left);
    LaborProgress {
        labor_left: left,
        completed: left <= Decimal::ZERO,
    }
}

/// Restore the full labor intensity for a fresh stage.
pub fn reset_labor<W: WorkItem + ?Sized>(item: &mut W) {
    let full = item.labor_intensity().max(Decimal::ZERO);
    item.set_labor_left(full);
}

/// Place the item in `column` at position `order`: labor resets, status
/// follows the column and the card is stamped.
pub fn enter_column<W: WorkItem + ?Sized>(item: &mut W, column: &str, order: u32) {
    let card = item.card_mut();
    column.clone_into(&mut card.column_id);
    card.order = order;
    card.touch();
    reset_labor(item);
    item.set_status(topology::status_for(column));
}

/// Whether the item is finished with its current stage.
pub fn is_complete<W: WorkItem + ?Sized>(item: &W) -> bool {
    item.labor_left() <= Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use kanban_board::columns::{ANALYSIS_1, BACKLOG};
    use kanban_types::{Priority, Seniority, TaskId};

    use super::*;

    fn task(intensity: Decimal) -> Task {
        Task {
            id: TaskId::new(),
            card: Card::new("Build login form", BACKLOG),
            priority: Priority::Medium,
            status: WorkStatus::ToDo,
            assignee: None,
            labor_intensity: intensity,
            labor_left: intensity,
            due_date: None,
            estimated_hours: 8,
            parent_feature_id: None,
            depends_on_task_id: None,
            dependency_satisfied: true,
        }
    }

    #[test]
    fn unit_task_completes_in_one_step() {
        let mut item = task(Decimal::ONE);
        let progress = advance_work(&mut item, Decimal::ONE);
        assert_eq!(progress.labor_left, Decimal::ZERO);
        assert!(progress.completed);
        assert!(is_complete(&item));
    }

    #[test]
    fn labor_floors_at_zero() {
        let mut item = task(Decimal::new(5, 1));
        let progress = advance_work(&mut item, Decimal::new(2, 0));
        assert_eq!(progress.labor_left, Decimal::ZERO);
        assert!(progress.completed);
    }

    #[test]
    fn partial_progress_is_not_complete() {
        let mut item = task(Decimal::new(3, 0));
        let progress = advance_work(&mut item, Decimal::ONE);
        assert_eq!(progress.labor_left, Decimal::new(2, 0));
        assert!(!progress.completed);
    }

    #[test]
    fn zero_efficiency_makes_no_progress() {
        let mut item = task(Decimal::new(2, 0));
        let progress = advance_work(&mut item, Decimal::ZERO);
        assert_eq!(progress.labor_left, Decimal::new(2, 0));
        assert!(!progress.completed);
    }

    #[test]
    fn entering_a_column_resets_labor_and_status() {
        let mut item = task(Decimal::new(2, 0));
        let _ = advance_work(&mut item, Decimal::ONE);
        enter_column(&mut item, ANALYSIS_1, 3);
        assert_eq!(item.labor_left, Decimal::new(2, 0));
        assert_eq!(item.card.column_id, ANALYSIS_1);
        assert_eq!(item.card.order, 3);
        assert_eq!(item.status, WorkStatus::InProgress);
        assert!(item.card.updated_at.is_some());
    }

    #[test]
    fn efficiency_reads_the_table() {
        let table = EfficiencyTable {
            junior: Decimal::new(5, 1),
            mid: Decimal::ONE,
            senior: Decimal::new(15, 1),
        };
        assert_eq!(efficiency(&table, Seniority::Junior), Decimal::new(5, 1));
        assert_eq!(efficiency(&table, Seniority::Senior), Decimal::new(15, 1));
    }
}
