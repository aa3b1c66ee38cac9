//! Variant API handlers

use crate::core::ServerState;
use crate::db::repository::variant;
use crate::options::cascade::normalize_gender;
use axum::{
    extract::{Path, State},
    Json,
};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    ItemColor, ItemVariant, ItemVariantSave, ItemVariantUpdate, MatrixEnsureReport,
    ResolvedSelection, VariantGenderGroup, VariantSelection,
};

/// GET /api/items/:sku/variants - grouped gender → color for table rendering
pub async fn list_grouped(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<Vec<VariantGenderGroup>>> {
    let groups = state.matrix.grouped_variants(&sku).await?;
    Ok(ApiResponse::success(groups))
}

/// POST /api/items/:sku/variants - create or update one variant row by slot
pub async fn save_row(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
    Json(payload): Json<ItemVariantSave>,
) -> AppResult<ApiResponse<ItemVariant>> {
    let pool = &state.db.pool;
    if matches!(payload.stock_level, Some(s) if s < 0) {
        return Err(AppError::new(ErrorCode::NegativeStock));
    }
    if let Some(color_id) = payload.color_id {
        let color = variant::find_color_by_id(pool, color_id)
            .await?
            .filter(|c| c.is_active && c.item_sku == sku);
        if color.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ColorNotFound,
                format!("Color {color_id} not found on item {sku}"),
            ));
        }
    }

    let gender = payload.gender.as_deref().map(normalize_gender);
    let existing = variant::find_by_slot(
        pool,
        &sku,
        gender.as_deref(),
        payload.color_id,
        &payload.size_code,
    )
    .await?;

    let saved = match existing {
        Some(v) => {
            variant::update(
                pool,
                v.id,
                ItemVariantUpdate {
                    size_name: Some(payload.size_name),
                    stock_level: payload.stock_level,
                    price_adjustment: payload.price_adjustment,
                    is_active: None,
                    display_order: payload.display_order,
                },
            )
            .await?
        }
        None => {
            let order = match payload.display_order {
                Some(o) => o,
                None => {
                    variant::max_display_order(pool, &sku, gender.as_deref(), payload.color_id)
                        .await?
                        + 1
                }
            };
            variant::insert_slot(
                pool,
                &sku,
                gender.as_deref(),
                payload.color_id,
                &payload.size_name,
                &payload.size_code,
                payload.stock_level.unwrap_or(0),
                payload.price_adjustment.unwrap_or(0),
                order,
            )
            .await?;
            variant::find_by_slot(pool, &sku, gender.as_deref(), payload.color_id, &payload.size_code)
                .await?
                .ok_or_else(|| AppError::database("Failed to save variant row"))?
        }
    };
    state.resolver.invalidate(&sku);
    Ok(ApiResponse::success(saved))
}

/// PUT /api/variants/:id - edit or deactivate one row
pub async fn update_row(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemVariantUpdate>,
) -> AppResult<ApiResponse<ItemVariant>> {
    if matches!(payload.stock_level, Some(s) if s < 0) {
        return Err(AppError::new(ErrorCode::NegativeStock));
    }
    let updated = variant::update(&state.db.pool, id, payload).await?;
    state.resolver.invalidate(&updated.item_sku);
    Ok(ApiResponse::success(updated))
}

/// POST /api/items/:sku/variants/ensure - additive matrix repair
pub async fn ensure_matrix(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<MatrixEnsureReport>> {
    let report = state.matrix.ensure_matrix(&sku).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/items/:sku/colors - colors in use
pub async fn list_colors(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<Vec<ItemColor>>> {
    let colors = variant::find_colors(&state.db.pool, &sku).await?;
    Ok(ApiResponse::success(colors))
}

/// GET /api/items/:sku/genders - distinct genders in use
pub async fn list_genders(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let genders = state.matrix.list_genders(&sku).await?;
    Ok(ApiResponse::success(genders))
}

/// POST /api/selection - validate a storefront (gender, color, size) pick
pub async fn resolve_selection(
    State(state): State<ServerState>,
    Json(payload): Json<VariantSelection>,
) -> AppResult<ApiResponse<ResolvedSelection>> {
    let resolved = state.matrix.resolve_selection(&payload).await?;
    Ok(ApiResponse::success(resolved))
}
