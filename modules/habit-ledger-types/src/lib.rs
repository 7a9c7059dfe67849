//! Shared types for the habit ledger service and its RPC clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// One habit completion record: a habit marked done (or not) on a
/// specific calendar day.
///
/// Records are physically grouped by `(owner, date)`; `id` is carried
/// inside the record and is never an access key on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub owner: String,
    pub date: String,
    pub name: String,
    pub note: Option<String>,
    pub completed: bool,
    pub created_at: String,
}

/// One point of the trend series: completed-record count for a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: i64,
}

/// A previously used habit name/note pair from the suggestion catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub note: Option<String>,
}

// =====================================================
// Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateHabitResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_records: i64,
}
