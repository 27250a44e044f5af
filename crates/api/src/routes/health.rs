use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use sudoku_core::types::Timestamp;

use crate::config::StorageBackend;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Server time the check was answered.
    pub timestamp: Timestamp,
    /// Configured diagram store (`postgres` or `memory`).
    pub storage: &'static str,
}

/// GET /health -- liveness plus build and storage info.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match state.config.storage {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
        storage,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
