//! Server startup helper for the engine binary.
//!
//! Provides [`spawn_server`] which launches the game HTTP + `WebSocket`
//! server on a background Tokio task.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kanban_server::{AppState, ServerConfig, spawn_server};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(session));
//! let handle = spawn_server(ServerConfig::default(), state)?;
//! handle.await?;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the game server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the game HTTP server on a background Tokio task.
///
/// The address is validated before the task is spawned, so obvious
/// misconfigurations fail here rather than in the background. The server
/// runs until the runtime shuts down or the returned handle is aborted.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if host and port do not form a valid
/// socket address.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "Game server exited with error");
        }
    });

    tracing::info!(%addr, "Game server spawned on background task");

    Ok(handle)
}
