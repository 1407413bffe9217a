//! Axum router construction for the game API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for browser clients served elsewhere.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::commands;
use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the game server.
///
/// See [`handlers`] and [`commands`] for the endpoint tables. CORS allows
/// any origin so classroom clients can be hosted anywhere.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/events", get(ws::ws_events))
        // Game overview
        .route("/api/state", get(handlers::get_state))
        .route("/api/boards", get(handlers::get_boards))
        // Cards
        .route(
            "/api/workers",
            get(handlers::list_workers).post(handlers::create_worker),
        )
        .route(
            "/api/workers/{id}",
            get(handlers::get_worker)
                .put(handlers::update_worker)
                .delete(handlers::delete_worker),
        )
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route(
            "/api/features",
            get(handlers::list_features).post(handlers::create_feature),
        )
        .route(
            "/api/features/{id}",
            get(handlers::get_feature)
                .put(handlers::update_feature)
                .delete(handlers::delete_feature),
        )
        // Worker lifecycle
        .route("/api/workers/{id}/unassign", post(commands::unassign))
        .route("/api/workers/{id}/vacation", post(commands::start_vacation))
        .route("/api/workers/{id}/end-vacation", post(commands::end_vacation))
        .route("/api/workers/{id}/fire", post(commands::fire))
        .route("/api/workers/{id}/rehire", post(commands::rehire))
        // Moves
        .route("/api/relocate", post(commands::relocate))
        .route("/api/assign", post(commands::assign))
        .route(
            "/api/features/{id}/send-to-development",
            post(commands::send_to_development),
        )
        // Game control
        .route("/api/advance-day", post(commands::advance_day))
        .route("/api/money", get(commands::get_money))
        .route("/api/money/add", post(commands::add_money))
        .route("/api/money/set", post(commands::set_money))
        .route("/api/achievements", get(commands::list_achievements))
        .route("/api/settings", put(commands::update_settings))
        .route("/api/restart", post(commands::restart))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
