//! Game API server for the Kanban workflow simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/events`) streaming every committed
//!   [`SessionEvent`] via [`tokio::sync::broadcast`]
//! - **REST endpoints** for cards: workers, tasks and features, with
//!   create, read, update and delete
//! - **Command endpoints** for play: relocation, assignment, worker
//!   lifecycle, advancing the day, money, settings and restart
//! - **Minimal HTML status page** (`GET /`) showing the day, balance and
//!   card counts
//!
//! # Architecture
//!
//! Every handler goes through the shared [`SessionHandle`]: the session is
//! locked for the duration of one operation, and the events it produced are
//! published to the broadcast channel once the lock is released.
//! `WebSocket` clients that fall behind skip ahead to the newest event.
//!
//! [`SessionEvent`]: kanban_core::SessionEvent
//! [`SessionHandle`]: kanban_core::SessionHandle

pub mod commands;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
pub use ws::StreamNotice;
