//! Axum route handlers for the habit ledger API.

use crate::auth::{AuthConfig, AuthOwner};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use habit_ledger_types::*;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub ledger: Ledger,
    pub auth: AuthConfig,
    pub start_time: Instant,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_reply(err: LedgerError) -> ApiError {
    let status = match err {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound => StatusCode::NOT_FOUND,
        LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::error!("Ledger operation failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.auth.login(&req.username, &req.password) {
        Some(token) => Ok(Json(LoginResponse {
            token,
            username: req.username,
        })),
        None => {
            log::warn!("Rejected login for {:?}", req.username);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid credentials".to_string(),
                }),
            ))
        }
    }
}

// GET /api/habits/:date
pub async fn list_habits(
    State(state): State<Arc<AppState>>,
    AuthOwner(owner): AuthOwner,
    Path(date): Path<String>,
) -> Result<Json<Vec<Habit>>, ApiError> {
    state.ledger.list(&owner, &date).map(Json).map_err(error_reply)
}

// POST /api/habits
pub async fn create_habit(
    State(state): State<Arc<AppState>>,
    AuthOwner(owner): AuthOwner,
    Json(req): Json<CreateHabitRequest>,
) -> Result<Json<CreateHabitResponse>, ApiError> {
    state
        .ledger
        .create(&owner, &req.date, &req.name, req.note, req.completed)
        .map(|id| Json(CreateHabitResponse { id }))
        .map_err(error_reply)
}

// DELETE /api/habits/:id
pub async fn delete_habit(
    State(state): State<Arc<AppState>>,
    AuthOwner(owner): AuthOwner,
    Path(id): Path<String>,
) -> Result<Json<DeleteHabitResponse>, ApiError> {
    state
        .ledger
        .delete(&owner, &id)
        .map(|()| Json(DeleteHabitResponse { success: true }))
        .map_err(error_reply)
}

// GET /api/trends
pub async fn trends(
    State(state): State<Arc<AppState>>,
    AuthOwner(owner): AuthOwner,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    state.ledger.trends(&owner).map(Json).map_err(error_reply)
}

// GET /api/habits/suggestions
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    AuthOwner(owner): AuthOwner,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    state
        .ledger
        .suggestions(&owner)
        .map(Json)
        .map_err(error_reply)
}

// GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_records: state.ledger.record_count().unwrap_or(0),
    })
}
