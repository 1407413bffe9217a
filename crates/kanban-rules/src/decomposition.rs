//! Feature-to-development decomposition.
//!
//! When a feature is sent to development it is split into backend and
//! frontend tasks. For each sub-board:
//!
//! ```text
//! count = clamp(ceil(story_points / points_per_task), min, max)
//! ```
//!
//! Every third task in a sub-board sequence depends on the task right
//! before it. A plan always holds at least one task, so a delivered feature
//! always has something to join on. This module only plans the tasks; the
//! session creates them.

use kanban_board::columns::{BACKEND_BACKLOG, FRONTEND_BACKLOG};
use kanban_types::BoardType;

use crate::config::{DecompositionConfig, TaskBounds};

/// Every n-th task of a sequence depends on its predecessor.
pub const DEPENDENCY_STRIDE: u32 = 3;

/// One task to be generated for a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    /// Sub-board the task lives on.
    pub board: BoardType,
    /// Backlog column the task starts in.
    pub column: &'static str,
    /// Display title.
    pub title: String,
    /// 1-based position within the sub-board sequence.
    pub sequence: u32,
    /// Whether the task depends on the previous task of the same sequence.
    pub depends_on_previous: bool,
}

/// Number of tasks to generate for `story_points` within `bounds`.
///
/// A zero `points_per_task` is treated as one point per task.
pub const fn task_count(story_points: u32, points_per_task: u32, bounds: TaskBounds) -> u32 {
    let per_task = if points_per_task == 0 { 1 } else { points_per_task };
    let raw = story_points.div_ceil(per_task);
    let min = bounds.min;
    let max = if bounds.max < min { min } else { bounds.max };
    if raw < min {
        min
    } else if raw > max {
        max
    } else {
        raw
    }
}

/// Plan the backend tasks followed by the frontend tasks for a feature.
///
/// When both sub-boards would get zero tasks, one backend task is planned.
pub fn plan_development(feature_title: &str, story_points: u32, config: &DecompositionConfig) -> Vec<PlannedTask> {
    let mut backend = task_count(story_points, config.points_per_task, config.backend);
    let frontend = task_count(story_points, config.points_per_task, config.frontend);
    if backend == 0 && frontend == 0 {
        backend = 1;
    }

    let mut plan = Vec::new();
    plan.extend(sequence(feature_title, BoardType::Backend, BACKEND_BACKLOG, "Backend", backend));
    plan.extend(sequence(feature_title, BoardType::Frontend, FRONTEND_BACKLOG, "Frontend", frontend));
    plan
}

fn sequence<'a>(
    feature_title: &'a str,
    board: BoardType,
    column: &'static str,
    label: &'a str,
    count: u32,
) -> impl Iterator<Item = PlannedTask> + 'a {
    (1..=count).map(move |n| PlannedTask {
        board,
        column,
        title: format!("{feature_title} - {label} task {n}"),
        sequence: n,
        depends_on_previous: n.checked_rem(DEPENDENCY_STRIDE) == Some(0),
    })
}
