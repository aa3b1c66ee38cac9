//! Option link API handlers

use crate::core::ServerState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{
    AppliesTo, AssignmentTarget, OptionAssignment, OptionAssignmentCreate, OptionAssignmentView,
    OptionType,
};

/// Flat target fields as they arrive in a query string
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub applies_to_type: AppliesTo,
    pub item_sku: Option<String>,
    pub category_id: Option<i64>,
}

impl TargetQuery {
    fn into_target(self) -> AppResult<AssignmentTarget> {
        match self.applies_to_type {
            AppliesTo::Sku => {
                let item_sku = self
                    .item_sku
                    .ok_or_else(|| AppError::validation("SKU target needs item_sku"))?;
                Ok(AssignmentTarget::Sku { item_sku })
            }
            AppliesTo::Category => {
                let category_id = self
                    .category_id
                    .ok_or_else(|| AppError::validation("Category target needs category_id"))?;
                Ok(AssignmentTarget::Category { category_id })
            }
        }
    }
}

/// GET /api/option-links?applies_to_type=sku&item_sku=...
pub async fn list_for_target(
    State(state): State<ServerState>,
    Query(query): Query<TargetQuery>,
) -> AppResult<ApiResponse<Vec<OptionAssignment>>> {
    let target = query.into_target()?;
    let links = state.templates.list_for_target(target).await?;
    Ok(ApiResponse::success(links))
}

/// GET /api/option-links/items/:sku - own and inherited links with category names
pub async fn list_for_item(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<Vec<OptionAssignmentView>>> {
    let links = state.templates.list_views_for_sku(&sku).await?;
    Ok(ApiResponse::success(links))
}

/// POST /api/option-links
pub async fn assign(
    State(state): State<ServerState>,
    Json(payload): Json<OptionAssignmentCreate>,
) -> AppResult<ApiResponse<OptionAssignment>> {
    let link = state.templates.assign(payload).await?;
    Ok(ApiResponse::success(link))
}

/// DELETE /api/option-links/:id
pub async fn unassign(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.templates.unassign(id).await?;
    Ok(ApiResponse::ok())
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub option_type: OptionType,
    #[serde(flatten)]
    pub target: AssignmentTarget,
}

/// POST /api/option-links/clear - drop all links of one type for a target
pub async fn clear(
    State(state): State<ServerState>,
    Json(payload): Json<ClearRequest>,
) -> AppResult<ApiResponse<u64>> {
    let cleared = state
        .templates
        .clear_option(payload.option_type, payload.target)
        .await?;
    Ok(ApiResponse::success(cleared))
}
