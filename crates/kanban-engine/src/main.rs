//! Game server binary for the Kanban workflow simulation.
//!
//! Loads configuration, seeds a new game and serves it over HTTP and
//! `WebSocket` until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `kanban-config.yaml` (or `KANBAN_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the game session and seed the starting company
//! 4. Start the game API server
//! 5. Wait for the server to exit or for `Ctrl-C`

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use kanban_core::{KanbanConfig, Session};
use kanban_server::{AppState, ServerConfig, spawn_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file used when `KANBAN_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "kanban-config.yaml";

/// Application entry point for the game server.
///
/// # Errors
///
/// Returns an error if configuration, seeding or server startup fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is configured from it, so this
    //    happens first.
    let (config, config_path, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG takes precedence.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_env_err| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("kanban-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        starting_money = %config.game.starting_money,
        onboarding_days = config.lifecycle.onboarding_days,
        days_to_learn_role = config.lifecycle.days_to_learn_role,
        days_to_change_teams = config.lifecycle.days_to_change_teams,
        points_per_task = config.decomposition.points_per_task,
        "Game rules configured"
    );

    // 3. Create and seed the session.
    let today = chrono::Local::now().date_naive();
    let mut session = Session::from_config(&config, today);
    session.seed()?;
    let status = session.status()?;
    info!(
        day = status.day,
        date = %status.date,
        workers = status.workers,
        features = status.features,
        tasks = status.tasks,
        "Game seeded"
    );

    // 4. Start the game API server.
    let state = Arc::new(AppState::new(session));
    let server = spawn_server(ServerConfig::from(&config.server), state)?;

    // 5. Serve until the server stops or the process is interrupted.
    tokio::select! {
        joined = server => {
            joined.map_err(|e| EngineError::Runtime {
                message: format!("server task failed: {e}"),
            })?;
            info!("Game server stopped");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| EngineError::Runtime {
                message: format!("failed to listen for shutdown signal: {e}"),
            })?;
            info!("Shutdown signal received");
        }
    }

    info!("kanban-engine shutdown complete");
    Ok(())
}

/// Load the game configuration.
///
/// Reads the file named by `KANBAN_CONFIG`, or `kanban-config.yaml` in the
/// working directory. A missing file means defaults. Returns the config,
/// the path consulted and whether the file existed.
fn load_config() -> Result<(KanbanConfig, PathBuf, bool), EngineError> {
    let config_path = std::env::var_os("KANBAN_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        let config = KanbanConfig::from_file(&config_path)?;
        Ok((config, config_path, true))
    } else {
        let mut config = KanbanConfig::default();
        config.server.apply_env_overrides();
        Ok((config, config_path, false))
    }
}
