//! Item & Category Models

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Item entity (the parent product of a variant matrix)
///
/// `stock_quantity` is the aggregate stock count; between syncs it may
/// diverge from the sum of variant rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub category_id: Option<i64>,
    /// Base price in minor currency units (cents)
    pub base_price: i64,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub sku: String,
    pub name: String,
    pub category_id: Option<i64>,
    pub base_price: Option<i64>,
    pub stock_quantity: Option<i64>,
}

/// Color in use on an item
///
/// Distinct from a template row: a color is "in use" once at least one
/// variant references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemColor {
    pub id: i64,
    pub item_sku: String,
    pub color_name: String,
    pub color_code: String,
    pub is_active: bool,
    pub display_order: i32,
}
