//! Color template API handlers

use crate::core::ServerState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    ColorTemplateCreate, ColorTemplateDetail, ColorTemplateUpdate, TemplateDeleteOptions,
    TemplateSummary,
};

/// GET /api/color-templates
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<TemplateSummary>>> {
    let templates = state.templates.list_color_templates().await?;
    Ok(ApiResponse::success(templates))
}

/// GET /api/color-templates/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ColorTemplateDetail>> {
    let detail = state.templates.get_color_template(id).await?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/color-templates
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ColorTemplateCreate>,
) -> AppResult<ApiResponse<ColorTemplateDetail>> {
    let detail = state.templates.create_color_template(payload).await?;
    Ok(ApiResponse::success(detail))
}

/// PUT /api/color-templates/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ColorTemplateUpdate>,
) -> AppResult<ApiResponse<ColorTemplateDetail>> {
    let detail = state.templates.update_color_template(id, payload).await?;
    Ok(ApiResponse::success(detail))
}

/// DELETE /api/color-templates/:id?force_remap_to=ID
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(opts): Query<TemplateDeleteOptions>,
) -> AppResult<ApiResponse<()>> {
    state.templates.delete_color_template(id, opts).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/color-templates/:id/duplicate
pub async fn duplicate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ColorTemplateDetail>> {
    let detail = state.templates.duplicate_color_template(id).await?;
    Ok(ApiResponse::success(detail))
}
