//! Shared type definitions for the Kanban workflow simulation.
//!
//! This crate is the single source of truth for the entity model used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the board UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Boards, roles, worker states, statuses, ledger tags
//! - [`structs`] -- Card entities (workers, tasks, features), ledger entries,
//!   achievements

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AchievementType, BoardType, ColumnKind, EntityKind, Priority, Role, Seniority,
    TransactionType, WorkStatus, WorkerStatus,
};
pub use ids::{FeatureId, TaskId, TransactionId, WorkerId};
pub use structs::{Achievement, Card, Feature, MoneyTransaction, Task, WorkItemRef, Worker};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::WorkerId::export_all();
        let _ = crate::ids::TaskId::export_all();
        let _ = crate::ids::FeatureId::export_all();
        let _ = crate::ids::TransactionId::export_all();

        // Enums
        let _ = crate::enums::BoardType::export_all();
        let _ = crate::enums::ColumnKind::export_all();
        let _ = crate::enums::Role::export_all();
        let _ = crate::enums::Seniority::export_all();
        let _ = crate::enums::WorkerStatus::export_all();
        let _ = crate::enums::WorkStatus::export_all();
        let _ = crate::enums::Priority::export_all();
        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::TransactionType::export_all();
        let _ = crate::enums::AchievementType::export_all();

        // Structs
        let _ = crate::structs::Card::export_all();
        let _ = crate::structs::WorkItemRef::export_all();
        let _ = crate::structs::Worker::export_all();
        let _ = crate::structs::Task::export_all();
        let _ = crate::structs::Feature::export_all();
        let _ = crate::structs::MoneyTransaction::export_all();
        let _ = crate::structs::Achievement::export_all();
    }
}
