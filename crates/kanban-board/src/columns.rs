//! Declarative column tables, one per board.
//!
//! Each [`ColumnSpec`] row carries every rule the engine needs about a
//! column: which role a worker must hold to stand there, where labor
//! completion sends a card (`next`), and which column feeds it (`intake`).
//! The intake relation doubles as the backward-drop table: a card may be
//! dropped from a column back to its intake, and assigning a card that sits
//! in the intake to a worker standing in the column pulls it forward.
//!
//! | Board | Columns |
//! |-------|---------|
//! | Analysis | backlog, analysis1, waiting, analysis2, ready-dev |
//! | Backend | backend-backlog ... backend-done (7 stages) |
//! | Frontend | frontend-backlog ... frontend-done (7 stages) |
//! | Summary | development, delivered |

use kanban_types::{BoardType, ColumnKind, Role, WorkStatus};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Well-known column ids
// ---------------------------------------------------------------------------

/// Analysis board entry column.
pub const BACKLOG: &str = "backlog";
/// First analysis stage.
pub const ANALYSIS_1: &str = "analysis1";
/// Between the two analysis stages.
pub const WAITING: &str = "waiting";
/// High-level analysis stage.
pub const ANALYSIS_2: &str = "analysis2";
/// Analysis finished, ready to be sent to development.
pub const READY_FOR_DEVELOPMENT: &str = "ready-dev";
/// Backend board entry column.
pub const BACKEND_BACKLOG: &str = "backend-backlog";
/// Backend terminal column.
pub const BACKEND_DONE: &str = "backend-done";
/// Frontend board entry column.
pub const FRONTEND_BACKLOG: &str = "frontend-backlog";
/// Frontend terminal column.
pub const FRONTEND_DONE: &str = "frontend-done";
/// Summary column holding features whose tasks are being built.
pub const DEVELOPMENT: &str = "development";
/// Summary column holding delivered features.
pub const DELIVERED: &str = "delivered";

// ---------------------------------------------------------------------------
// Row and board types
// ---------------------------------------------------------------------------

/// One row of a board's column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    /// Globally unique column id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Stage kind.
    pub kind: ColumnKind,
    /// Status reported by work items sitting here.
    pub status: WorkStatus,
    /// Role a worker must hold (or learn) to stand here. Columns with a
    /// requirement form the board's worker allow-list.
    pub required_role: Option<Role>,
    /// Where labor completion sends a card.
    pub next: Option<&'static str>,
    /// Column feeding this one.
    pub intake: Option<&'static str>,
}

/// A board and its ordered column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardSpec {
    /// Which board.
    pub board: BoardType,
    /// Display name.
    pub name: &'static str,
    /// Whether participants may not relocate cards here.
    pub read_only: bool,
    /// Columns in display order.
    pub columns: &'static [ColumnSpec],
}

const fn column(
    id: &'static str,
    name: &'static str,
    kind: ColumnKind,
    status: WorkStatus,
    required_role: Option<Role>,
    next: Option<&'static str>,
    intake: Option<&'static str>,
) -> ColumnSpec {
    ColumnSpec {
        id,
        name,
        kind,
        status,
        required_role,
        next,
        intake,
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Analysis board.
pub const ANALYSIS_COLUMNS: [ColumnSpec; 5] = [
    column(BACKLOG, "Backlog", ColumnKind::Backlog, WorkStatus::ToDo, None, Some(ANALYSIS_1), None),
    column(
        ANALYSIS_1,
        "Analysis 1",
        ColumnKind::Doing,
        WorkStatus::InProgress,
        Some(Role::Analyst),
        Some(WAITING),
        Some(BACKLOG),
    ),
    column(WAITING, "Waiting", ColumnKind::Waiting, WorkStatus::Waiting, None, Some(ANALYSIS_2), None),
    column(
        ANALYSIS_2,
        "Analysis 2",
        ColumnKind::Doing,
        WorkStatus::InProgress,
        Some(Role::HighLevelAnalyst),
        Some(READY_FOR_DEVELOPMENT),
        Some(WAITING),
    ),
    column(
        READY_FOR_DEVELOPMENT,
        "Ready for Development",
        ColumnKind::ReadyForDevelopment,
        WorkStatus::Waiting,
        None,
        None,
        None,
    ),
];

/// Builds the seven-stage table shared by the development boards.
macro_rules! development_columns {
    ($prefix:literal) => {
        [
            column(
                concat!($prefix, "-backlog"),
                "Backlog",
                ColumnKind::Backlog,
                WorkStatus::ToDo,
                None,
                Some(concat!($prefix, "-analysis")),
                None,
            ),
            column(
                concat!($prefix, "-analysis"),
                "Analysis",
                ColumnKind::Doing,
                WorkStatus::InProgress,
                Some(Role::Analyst),
                Some(concat!($prefix, "-dev-waiting")),
                Some(concat!($prefix, "-backlog")),
            ),
            column(
                concat!($prefix, "-dev-waiting"),
                "Dev Waiting",
                ColumnKind::Waiting,
                WorkStatus::Waiting,
                None,
                Some(concat!($prefix, "-dev-doing")),
                None,
            ),
            column(
                concat!($prefix, "-dev-doing"),
                "Development",
                ColumnKind::Doing,
                WorkStatus::InProgress,
                Some(Role::Developer),
                Some(concat!($prefix, "-test-waiting")),
                Some(concat!($prefix, "-dev-waiting")),
            ),
            column(
                concat!($prefix, "-test-waiting"),
                "Test Waiting",
                ColumnKind::Waiting,
                WorkStatus::Waiting,
                None,
                Some(concat!($prefix, "-test-doing")),
                None,
            ),
            column(
                concat!($prefix, "-test-doing"),
                "Testing",
                ColumnKind::Doing,
                WorkStatus::Testing,
                Some(Role::Tester),
                Some(concat!($prefix, "-done")),
                Some(concat!($prefix, "-test-waiting")),
            ),
            column(
                concat!($prefix, "-done"),
                "Done",
                ColumnKind::Done,
                WorkStatus::Done,
                None,
                None,
                None,
            ),
        ]
    };
}

/// Backend board.
pub const BACKEND_COLUMNS: [ColumnSpec; 7] = development_columns!("backend");

/// Frontend board.
pub const FRONTEND_COLUMNS: [ColumnSpec; 7] = development_columns!("frontend");

/// Summary board.
pub const SUMMARY_COLUMNS: [ColumnSpec; 2] = [
    column(
        DEVELOPMENT,
        "In Development",
        ColumnKind::Development,
        WorkStatus::InProgress,
        None,
        None,
        None,
    ),
    column(DELIVERED, "Delivered", ColumnKind::Delivered, WorkStatus::Done, None, None, None),
];

/// Analysis board definition.
pub const ANALYSIS_BOARD: BoardSpec = BoardSpec {
    board: BoardType::Analysis,
    name: "Analysis",
    read_only: BoardType::Analysis.is_read_only(),
    columns: &ANALYSIS_COLUMNS,
};

/// Backend board definition.
pub const BACKEND_BOARD: BoardSpec = BoardSpec {
    board: BoardType::Backend,
    name: "Backend",
    read_only: BoardType::Backend.is_read_only(),
    columns: &BACKEND_COLUMNS,
};

/// Frontend board definition.
pub const FRONTEND_BOARD: BoardSpec = BoardSpec {
    board: BoardType::Frontend,
    name: "Frontend",
    read_only: BoardType::Frontend.is_read_only(),
    columns: &FRONTEND_COLUMNS,
};

/// Summary board definition.
pub const SUMMARY_BOARD: BoardSpec = BoardSpec {
    board: BoardType::Summary,
    name: "Summary",
    read_only: BoardType::Summary.is_read_only(),
    columns: &SUMMARY_COLUMNS,
};

/// Every board with its table, in display order.
pub static BOARDS: [BoardSpec; 4] = [ANALYSIS_BOARD, BACKEND_BOARD, FRONTEND_BOARD, SUMMARY_BOARD];
