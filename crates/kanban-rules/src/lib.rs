//! Rule layer for the Kanban workflow simulation.
//!
//! Everything here is pure: functions take entities and configuration by
//! reference and return verdicts or mutate the entity they are handed. No
//! I/O, no clocks, no global state. The session in `kanban-core` composes
//! these rules into operations and the daily tick.
//!
//! # Modules
//!
//! - [`config`] -- Thresholds, efficiency table and decomposition bounds
//! - [`error`] -- Errors raised by explicit lifecycle commands
//! - [`labor`] -- The [`WorkItem`] view and labor arithmetic
//! - [`validation`] -- Relocation and assignment legality
//! - [`lifecycle`] -- Worker state machine
//! - [`decomposition`] -- Feature-to-task planning

pub mod config;
pub mod decomposition;
pub mod error;
pub mod labor;
pub mod lifecycle;
pub mod validation;

pub use config::{DecompositionConfig, EfficiencyTable, LifecycleConfig, RulesConfig, TaskBounds};
pub use decomposition::{PlannedTask, plan_development, task_count};
pub use error::RulesError;
pub use labor::{LaborProgress, WorkItem, advance_work, efficiency, enter_column, is_complete};
pub use lifecycle::{LearningOutcome, StatusChange};
pub use validation::{CardRef, Rejection, can_assign, can_relocate, check_assignment, check_relocation};
