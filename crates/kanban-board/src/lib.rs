//! Board topology for the Kanban workflow simulation.
//!
//! Every rule about columns lives in one declarative table per board:
//! labor progression, backward adjacency, role requirements and the worker
//! allow-list. Both the move validator and the worker lifecycle consult
//! these tables; nothing else hard-codes a column id.
//!
//! # Modules
//!
//! - [`columns`] -- The per-board column tables and well-known column ids.
//! - [`topology`] -- Lookups over the tables (board of a column, next stage,
//!   backward target, required role).
//! - [`error`] -- Error types for column resolution.

pub mod columns;
pub mod error;
pub mod topology;

pub use columns::{BOARDS, BoardSpec, ColumnSpec};
pub use error::BoardError;
