//! Cascade API handlers

use crate::core::ServerState;
use crate::db::repository::item;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{CascadeSource, EffectiveOptions, OptionSettings, OptionSettingsUpsert};

/// GET /api/items/:sku/options - resolved option lists for dimension pickers
pub async fn resolve(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<EffectiveOptions>> {
    let options = state.resolver.resolve(&sku).await?;
    Ok(ApiResponse::success(options))
}

/// GET /api/items/:sku/cascade-settings - the settings row the SKU resolves to
pub async fn get_settings(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<OptionSettings>> {
    let item_row = item::find_by_sku(&state.db.pool, &sku).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ItemNotFound, format!("Item {sku} not found"))
    })?;
    let settings = state
        .resolver
        .effective_settings(&sku, item_row.category_id)
        .await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/cascade-settings - upsert a settings row at any scope
pub async fn save_settings(
    State(state): State<ServerState>,
    Json(payload): Json<OptionSettingsUpsert>,
) -> AppResult<ApiResponse<OptionSettings>> {
    let saved = state.resolver.save_settings(payload).await?;
    Ok(ApiResponse::success(saved))
}

#[derive(Debug, Deserialize)]
pub struct SettingsScopeQuery {
    pub scope: CascadeSource,
    pub item_sku: Option<String>,
    pub category_id: Option<i64>,
}

/// DELETE /api/cascade-settings?scope=sku&item_sku=... - drop a settings row
pub async fn delete_settings(
    State(state): State<ServerState>,
    Query(query): Query<SettingsScopeQuery>,
) -> AppResult<ApiResponse<()>> {
    let deleted = state
        .resolver
        .delete_settings(query.scope, query.item_sku.as_deref(), query.category_id)
        .await?;
    if !deleted {
        return Err(AppError::not_found("Cascade settings"));
    }
    Ok(ApiResponse::ok())
}
