//! Command handlers: the moves and decisions participants make.
//!
//! Relocation and assignment answer `{"allowed": bool}`. A rejected move is
//! a normal outcome, not an error, and leaves the game unchanged.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/relocate` | Drag a card onto a column |
//! | `POST` | `/api/assign` | Give a work item to a worker |
//! | `POST` | `/api/workers/{id}/unassign` | Release a worker's work item |
//! | `POST` | `/api/workers/{id}/vacation` | Start a vacation |
//! | `POST` | `/api/workers/{id}/end-vacation` | End a vacation early |
//! | `POST` | `/api/workers/{id}/fire` | Fire a worker |
//! | `POST` | `/api/workers/{id}/rehire` | Rehire a fired worker |
//! | `POST` | `/api/features/{id}/send-to-development` | Decompose a feature |
//! | `POST` | `/api/advance-day` | Run the daily tick |
//! | `GET` | `/api/money` | Balance and transactions |
//! | `POST` | `/api/money/add` | Record a manual adjustment |
//! | `POST` | `/api/money/set` | Overwrite the balance |
//! | `GET` | `/api/achievements` | Unlocked achievements |
//! | `PUT` | `/api/settings` | Change display settings |
//! | `POST` | `/api/restart` | Start a new game |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use kanban_core::{Session, SettingsUpdate};
use kanban_types::{Achievement, BoardType, FeatureId, MoneyTransaction, Worker, WorkerId};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::parse_uuid;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/relocate`.
#[derive(Debug, serde::Deserialize)]
pub struct RelocateRequest {
    /// Worker, task or feature to move.
    pub entity_id: Uuid,
    /// Board the card is dropped on.
    pub board: BoardType,
    /// Column the card is dropped on.
    pub column_id: String,
}

/// Request body for `POST /api/assign`.
#[derive(Debug, serde::Deserialize)]
pub struct AssignRequest {
    /// Task or feature to work on.
    pub work_item_id: Uuid,
    /// Worker taking the item.
    pub worker_id: Uuid,
}

/// Request body for `POST /api/workers/{id}/vacation`.
#[derive(Debug, serde::Deserialize)]
pub struct VacationRequest {
    /// Length of the vacation in days (at least 1).
    pub days: u32,
}

/// Request body for `POST /api/money/add`.
#[derive(Debug, serde::Deserialize)]
pub struct AddMoneyRequest {
    /// Signed amount; negative amounts are expenses.
    pub amount: Decimal,
    /// Ledger description (default: "Feature completed").
    pub description: Option<String>,
}

/// Request body for `POST /api/money/set`.
#[derive(Debug, serde::Deserialize)]
pub struct SetMoneyRequest {
    /// The new balance.
    pub amount: Decimal,
}

/// Answer to a move request.
#[derive(Debug, serde::Serialize)]
struct MoveResponse {
    /// Whether the move was legal and applied.
    allowed: bool,
}

/// Generic command response.
#[derive(Debug, serde::Serialize)]
struct CommandResponse {
    /// Whether the command changed anything.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// POST /api/relocate
// ---------------------------------------------------------------------------

/// Drag a card onto a column. Illegal moves answer `allowed: false`.
pub async fn relocate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RelocateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let allowed = state
        .handle
        .with(|s| s.relocate(request.entity_id, request.board, &request.column_id))
        .await?;
    Ok(Json(MoveResponse { allowed }))
}

// ---------------------------------------------------------------------------
// POST /api/assign
// ---------------------------------------------------------------------------

/// Give a work item to a worker. Illegal assignments answer
/// `allowed: false`.
pub async fn assign(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let worker = WorkerId::from(request.worker_id);
    let allowed = state
        .handle
        .with(|s| s.assign(request.work_item_id, worker))
        .await?;
    Ok(Json(MoveResponse { allowed }))
}

// ---------------------------------------------------------------------------
// Worker lifecycle
// ---------------------------------------------------------------------------

/// Release a worker from its work item.
pub async fn unassign(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let released = state.handle.with(|s| s.unassign(id)).await?;
    let message = if released {
        "Worker released from its work item"
    } else {
        "Worker had no work item"
    };
    Ok(Json(CommandResponse {
        ok: released,
        message: message.to_owned(),
    }))
}

/// Send a worker on vacation for `days` days.
pub async fn start_vacation(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(request): Json<VacationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let worker: Worker = state
        .handle
        .with(|s| s.start_vacation(id, request.days).cloned())
        .await?;
    Ok(Json(worker))
}

/// Bring a worker back from vacation early.
pub async fn end_vacation(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let worker: Worker = state.handle.with(|s| s.end_vacation(id).cloned()).await?;
    Ok(Json(worker))
}

/// Fire a worker, releasing its work item.
pub async fn fire(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let worker: Worker = state.handle.with(|s| s.fire_worker(id).cloned()).await?;
    Ok(Json(worker))
}

/// Rehire a fired worker as Active.
pub async fn rehire(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = WorkerId::from(parse_uuid(&id_str)?);
    let worker: Worker = state.handle.with(|s| s.rehire_worker(id).cloned()).await?;
    Ok(Json(worker))
}

// ---------------------------------------------------------------------------
// POST /api/features/{id}/send-to-development
// ---------------------------------------------------------------------------

/// Move a ready feature to development and generate its tasks.
pub async fn send_to_development(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = FeatureId::from(parse_uuid(&id_str)?);
    let tasks = state.handle.with(|s| s.send_to_development(id)).await?;
    Ok(Json(serde_json::json!({
        "feature_id": id,
        "count": tasks.len(),
        "task_ids": tasks,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/advance-day
// ---------------------------------------------------------------------------

/// Run the daily tick and return its summary.
pub async fn advance_day(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.handle.with(Session::advance_day).await?;
    info!(
        day = summary.day,
        stages = summary.stages_completed,
        delivered = summary.features_delivered.len(),
        errors = summary.errors.len(),
        "Day advanced"
    );
    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// Return the balance and every ledger entry.
pub async fn get_money(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (balance, transactions): (Decimal, Vec<MoneyTransaction>) = state
        .handle
        .read(|s| (s.balance(), s.ledger().transactions().to_vec()))
        .await;
    Json(serde_json::json!({
        "balance": balance,
        "count": transactions.len(),
        "transactions": transactions,
    }))
}

/// Record a manual income or expense.
pub async fn add_money(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddMoneyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (transaction, balance) = state
        .handle
        .with(|s| {
            s.add_money(request.amount, request.description.as_deref())
                .map(|t| (t, s.balance()))
        })
        .await?;
    Ok(Json(serde_json::json!({
        "balance": balance,
        "transaction": transaction,
    })))
}

/// Overwrite the balance. No transaction is recorded.
pub async fn set_money(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetMoneyRequest>,
) -> impl IntoResponse {
    let balance = state.handle.with(|s| s.set_money(request.amount)).await;
    Json(serde_json::json!({ "balance": balance }))
}

// ---------------------------------------------------------------------------
// GET /api/achievements
// ---------------------------------------------------------------------------

/// List unlocked achievements.
pub async fn list_achievements(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let achievements: Vec<Achievement> = state
        .handle
        .read(|s| s.achievements().cloned().collect())
        .await;
    Json(serde_json::json!({
        "count": achievements.len(),
        "achievements": achievements,
    }))
}

// ---------------------------------------------------------------------------
// PUT /api/settings
// ---------------------------------------------------------------------------

/// Change display settings. Omitted fields keep their value.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> impl IntoResponse {
    let settings = state.handle.with(|s| s.update_settings(update)).await;
    Json(settings)
}

// ---------------------------------------------------------------------------
// POST /api/restart
// ---------------------------------------------------------------------------

/// Throw the current game away and start a freshly seeded one.
pub async fn restart(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.handle.with(Session::restart).await?;
    Ok(Json(CommandResponse {
        ok: true,
        message: "Game restarted".to_owned(),
    }))
}
