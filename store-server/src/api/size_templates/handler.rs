//! Size template API handlers

use crate::core::ServerState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    ApplyTemplateRequest, ApplyTemplateResult, SizeTemplateCreate, SizeTemplateDetail,
    SizeTemplateUpdate, TemplateDeleteOptions, TemplateSummary,
};

/// GET /api/size-templates
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<TemplateSummary>>> {
    let templates = state.templates.list_size_templates().await?;
    Ok(ApiResponse::success(templates))
}

/// GET /api/size-templates/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<SizeTemplateDetail>> {
    let detail = state.templates.get_size_template(id).await?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/size-templates
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SizeTemplateCreate>,
) -> AppResult<ApiResponse<SizeTemplateDetail>> {
    let detail = state.templates.create_size_template(payload).await?;
    Ok(ApiResponse::success(detail))
}

/// PUT /api/size-templates/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SizeTemplateUpdate>,
) -> AppResult<ApiResponse<SizeTemplateDetail>> {
    let detail = state.templates.update_size_template(id, payload).await?;
    Ok(ApiResponse::success(detail))
}

/// DELETE /api/size-templates/:id?force_remap_to=ID
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(opts): Query<TemplateDeleteOptions>,
) -> AppResult<ApiResponse<()>> {
    state.templates.delete_size_template(id, opts).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/size-templates/:id/duplicate
pub async fn duplicate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<SizeTemplateDetail>> {
    let detail = state.templates.duplicate_size_template(id).await?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/size-templates/:id/apply
pub async fn apply(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ApplyTemplateRequest>,
) -> AppResult<ApiResponse<ApplyTemplateResult>> {
    let result = state.templates.apply_size_template(id, payload).await?;
    Ok(ApiResponse::success(result))
}
