//! Stock API handlers

use crate::core::ServerState;
use crate::options::stock::AggregateFilter;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppResult};
use shared::models::{StockAggregates, StockSummary, StockSyncResult};

#[derive(Debug, Default, Deserialize)]
pub struct AggregatesQuery {
    pub gender: Option<String>,
    pub size_code: Option<String>,
    pub color_id: Option<i64>,
}

/// GET /api/items/:sku/stock/aggregates - stock rolled up by dimension
pub async fn aggregates(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
    Query(query): Query<AggregatesQuery>,
) -> AppResult<ApiResponse<StockAggregates>> {
    let filter = AggregateFilter {
        gender: query.gender,
        size_code: query.size_code,
        color_id: query.color_id,
    };
    let result = state.stock.aggregates(&sku, &filter).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/items/:sku/stock/summary - aggregate vs. variant sum, read-only
pub async fn summary(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<StockSummary>> {
    let result = state.stock.summary(&sku).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/items/:sku/stock/sync - aggregate = sum of active variants
pub async fn sync(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<StockSyncResult>> {
    let result = state.stock.sync_from_variants(&sku).await?;
    Ok(ApiResponse::success(result))
}

#[derive(Debug, Deserialize)]
pub struct DistributeRequest {
    pub target_total: i64,
}

/// POST /api/items/:sku/stock/distribute - split an edited aggregate evenly
pub async fn distribute(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
    Json(payload): Json<DistributeRequest>,
) -> AppResult<ApiResponse<StockSyncResult>> {
    let result = state
        .stock
        .distribute_evenly(&sku, payload.target_total)
        .await?;
    Ok(ApiResponse::success(result))
}
