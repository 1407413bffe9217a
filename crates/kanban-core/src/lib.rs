//! Game session, daily tick and orchestration for the Kanban workflow
//! simulation.
//!
//! A [`Session`] composes the pure rules of `kanban-rules` with the board
//! tables of `kanban-board` and the ledger of `kanban-ledger` into the
//! operations a classroom plays with: moving cards, assigning work,
//! advancing the day and sending features to development.
//!
//! # Modules
//!
//! - [`clock`] -- Day counter and simulated calendar date.
//! - [`config`] -- Configuration loading from `kanban-config.yaml` into
//!   strongly-typed structs.
//! - [`events`] -- [`SessionEvent`] and the [`EventSink`] trait.
//! - [`error`] -- [`SessionError`].
//! - [`session`] -- The [`Session`] and its queries.
//! - [`cards`] -- Creating, updating and deleting cards.
//! - [`moves`] -- Relocation and assignment.
//! - [`staff`] -- Vacation, firing and rehiring.
//! - [`development`] -- Feature decomposition and display settings.
//! - [`economy`] -- Money and achievements.
//! - [`work`] -- Labor, stage completion and delivery.
//! - [`tick`] -- The daily tick and its [`TickSummary`].
//! - [`seed`] -- Starting cards and restart.
//! - [`handle`] -- [`SessionHandle`] for shared async access.
//!
//! [`SessionEvent`]: events::SessionEvent
//! [`EventSink`]: events::EventSink
//! [`SessionError`]: error::SessionError
//! [`Session`]: session::Session
//! [`TickSummary`]: tick::TickSummary
//! [`SessionHandle`]: handle::SessionHandle

pub mod cards;
pub mod clock;
pub mod config;
pub mod development;
pub mod economy;
pub mod error;
pub mod events;
pub mod handle;
pub mod moves;
pub mod seed;
pub mod session;
pub mod staff;
pub mod tick;
pub mod work;

pub use cards::{FeatureUpdate, NewFeature, NewTask, NewWorker, TaskUpdate, WorkerUpdate};
pub use config::KanbanConfig;
pub use development::SettingsUpdate;
pub use error::SessionError;
pub use events::{EventSink, NoOpSink, SessionEvent};
pub use handle::SessionHandle;
pub use session::{GameStatus, Session, Settings};
pub use tick::{LearnedRole, TickSummary};
