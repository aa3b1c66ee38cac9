//! Health API handlers

use crate::core::ServerState;
use axum::extract::State;
use serde::Serialize;
use shared::error::{ApiResponse, AppResult};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> AppResult<ApiResponse<HealthStatus>> {
    // A cheap query proves the pool is alive
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db.pool)
        .await
        .map_err(|e| shared::error::AppError::database(e.to_string()))?;
    Ok(ApiResponse::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
