//! REST handlers for the status page, board topology and cards.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/state` | Day, date, balance, settings and counts |
//! | `GET` | `/api/boards` | Board and column topology |
//! | `GET` `POST` | `/api/workers` | List (`?column=`) / hire |
//! | `GET` `PUT` `DELETE` | `/api/workers/{id}` | Read / edit / remove |
//! | `GET` `POST` | `/api/tasks` | List (`?column=`) / create |
//! | `GET` `PUT` `DELETE` | `/api/tasks/{id}` | Read / edit / remove |
//! | `GET` `POST` | `/api/features` | List (`?column=`) / create |
//! | `GET` `PUT` `DELETE` | `/api/features/{id}` | Read / edit / remove |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use kanban_board::BOARDS;
use kanban_board::columns::READY_FOR_DEVELOPMENT;
use kanban_board::topology;
use kanban_core::{
    FeatureUpdate, NewFeature, NewTask, NewWorker, Session, SessionError, TaskUpdate, WorkerUpdate,
};
use kanban_types::{BoardType, Feature, FeatureId, Task, TaskId, Worker, WorkerId};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the card list endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct ColumnQuery {
    /// Only return cards in this column.
    pub column: Option<String>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the game status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let status = state.handle.read(Session::status).await?;
    let day = status.day;
    let date = status.date;
    let money = status.money;
    let workers = status.workers;
    let tasks = status.tasks;
    let features = status.features;
    let achievements = status.achievements;

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Kanban Simulation</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .get::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .post::before {{ content: "POST "; color: #d2a8ff; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Kanban Simulation</h1>
    <p class="subtitle">Turn-based workflow game server</p>

    <div>
        <div class="metric">
            <div class="label">Day</div>
            <div class="value">{day}</div>
        </div>
        <div class="metric">
            <div class="label">Date</div>
            <div class="value">{date}</div>
        </div>
        <div class="metric">
            <div class="label">Money</div>
            <div class="value">{money}</div>
        </div>
        <div class="metric">
            <div class="label">Workers</div>
            <div class="value">{workers}</div>
        </div>
        <div class="metric">
            <div class="label">Tasks</div>
            <div class="value">{tasks}</div>
        </div>
        <div class="metric">
            <div class="label">Features</div>
            <div class="value">{features}</div>
        </div>
        <div class="metric">
            <div class="label">Achievements</div>
            <div class="value">{achievements}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li class="get"><a href="/api/state">/api/state</a> -- Day, money and counts</li>
        <li class="get"><a href="/api/boards">/api/boards</a> -- Boards and columns</li>
        <li class="get"><a href="/api/workers">/api/workers</a> -- Workers (?column=ID)</li>
        <li class="get"><a href="/api/tasks">/api/tasks</a> -- Tasks (?column=ID)</li>
        <li class="get"><a href="/api/features">/api/features</a> -- Features (?column=ID)</li>
        <li class="get"><a href="/api/money">/api/money</a> -- Balance and transactions</li>
        <li class="get"><a href="/api/achievements">/api/achievements</a> -- Unlocked achievements</li>
        <li class="post">/api/relocate -- Drag a card</li>
        <li class="post">/api/assign -- Give a work item to a worker</li>
        <li class="post">/api/advance-day -- Run the daily tick</li>
        <li class="post">/api/restart -- Start over</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/events</code> -- Live game event stream</li>
    </ul>
</body>
</html>"#
    )))
}

// ---------------------------------------------------------------------------
// GET /api/state -- game overview
// ---------------------------------------------------------------------------

/// Return the day, date, balance, settings and card counts.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let status = state.handle.read(Session::status).await?;
    Ok(Json(status))
}

// ---------------------------------------------------------------------------
// GET /api/boards -- board topology
// ---------------------------------------------------------------------------

/// Return every board with its columns, marking what the current settings
/// hide.
pub async fn get_boards(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let settings = state.handle.read(|s| *s.settings()).await;

    let boards: Vec<serde_json::Value> = BOARDS
        .iter()
        .map(|board| {
            let columns: Vec<serde_json::Value> = board
                .columns
                .iter()
                .map(|column| {
                    serde_json::json!({
                        "column": column,
                        "visible": column.id != READY_FOR_DEVELOPMENT
                            || settings.ready_for_development_visible,
                    })
                })
                .collect();
            serde_json::json!({
                "board": board.board,
                "name": board.name,
                "read_only": board.read_only,
                "visible": board.board != BoardType::Summary || settings.summary_board_visible,
                "columns": columns,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": boards.len(),
        "boards": boards,
    }))
}

// ---------------------------------------------------------------------------
// /api/workers
// ---------------------------------------------------------------------------

/// List workers, optionally only those in one column.
pub async fn list_workers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ColumnQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let column = params.column.as_deref().map(known_column).transpose()?;

    let workers: Vec<Worker> = state
        .handle
        .read(|s| match column {
            Some(column) => s.workers_in(column).into_iter().cloned().collect(),
            None => s.workers().cloned().collect(),
        })
        .await;

    Ok(Json(serde_json::json!({
        "count": workers.len(),
        "workers": workers,
    })))
}

/// Return a single worker.
pub async fn get_worker(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let worker = state.handle.read(|s| s.worker(id).cloned()).await?;
    Ok(Json(worker))
}

/// Hire a worker. New hires start onboarding.
pub async fn create_worker(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewWorker>,
) -> Result<impl IntoResponse, ApiError> {
    let worker = state
        .handle
        .with(|s| -> Result<Worker, SessionError> {
            let id = s.create_worker(request)?;
            s.worker(id).cloned()
        })
        .await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

/// Edit a worker's fields.
pub async fn update_worker(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(update): Json<WorkerUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let worker = state
        .handle
        .with(|s| s.update_worker(id, update).cloned())
        .await?;
    Ok(Json(worker))
}

/// Remove a worker, releasing its work item.
pub async fn delete_worker(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    state.handle.with(|s| s.delete_worker(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// /api/tasks
// ---------------------------------------------------------------------------

/// List tasks, optionally only those in one column.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ColumnQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let column = params.column.as_deref().map(known_column).transpose()?;

    let tasks: Vec<Task> = state
        .handle
        .read(|s| match column {
            Some(column) => s.tasks_in(column).into_iter().cloned().collect(),
            None => s.tasks().cloned().collect(),
        })
        .await;

    Ok(Json(serde_json::json!({
        "count": tasks.len(),
        "tasks": tasks,
    })))
}

/// Return a single task.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = TaskId::from(parse_uuid(&id_str)?);
    let task = state.handle.read(|s| s.task(id).cloned()).await?;
    Ok(Json(task))
}

/// Create a task.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state
        .handle
        .with(|s| -> Result<Task, SessionError> {
            let id = s.create_task(request)?;
            s.task(id).cloned()
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Edit a task's fields.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let id = TaskId::from(parse_uuid(&id_str)?);
    let task = state.handle.with(|s| s.update_task(id, update).cloned()).await?;
    Ok(Json(task))
}

/// Remove a task.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = TaskId::from(parse_uuid(&id_str)?);
    state.handle.with(|s| s.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// /api/features
// ---------------------------------------------------------------------------

/// List features, optionally only those in one column.
pub async fn list_features(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ColumnQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let column = params.column.as_deref().map(known_column).transpose()?;

    let features: Vec<Feature> = state
        .handle
        .read(|s| match column {
            Some(column) => s.features_in(column).into_iter().cloned().collect(),
            None => s.features().cloned().collect(),
        })
        .await;

    Ok(Json(serde_json::json!({
        "count": features.len(),
        "features": features,
    })))
}

/// Return a single feature.
pub async fn get_feature(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = FeatureId::from(parse_uuid(&id_str)?);
    let feature = state.handle.read(|s| s.feature(id).cloned()).await?;
    Ok(Json(feature))
}

/// Create a feature on the analysis board.
pub async fn create_feature(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewFeature>,
) -> Result<impl IntoResponse, ApiError> {
    let feature = state
        .handle
        .with(|s| -> Result<Feature, SessionError> {
            let id = s.create_feature(request)?;
            s.feature(id).cloned()
        })
        .await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

/// Edit a feature's fields.
pub async fn update_feature(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(update): Json<FeatureUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let id = FeatureId::from(parse_uuid(&id_str)?);
    let feature = state
        .handle
        .with(|s| s.update_feature(id, update).cloned())
        .await?;
    Ok(Json(feature))
}

/// Remove a feature together with its generated tasks.
pub async fn delete_feature(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = FeatureId::from(parse_uuid(&id_str)?);
    state.handle.with(|s| s.delete_feature(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a UUID from a string, returning an [`ApiError`] on failure.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, ApiError> {
    s.parse::<Uuid>()
        .map_err(|e| ApiError::InvalidUuid(format!("{s}: {e}")))
}

/// Check that a column filter names a real column.
fn known_column(id: &str) -> Result<&str, ApiError> {
    topology::require_column(id)
        .map(|_| id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
