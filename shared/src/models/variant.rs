//! Item Variant Models

use serde::{Deserialize, Serialize};

/// Default gender label for rows created without an explicit gender
pub const DEFAULT_GENDER: &str = "Unisex";

/// Purchasable variant row (one gender × color × size slot)
///
/// `color_id = None` marks a color-independent "general" size. Rows are
/// soft-deleted via `is_active = false` to preserve order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemVariant {
    pub id: i64,
    pub item_sku: String,
    pub gender: Option<String>,
    pub color_id: Option<i64>,
    pub size_name: String,
    pub size_code: String,
    pub stock_level: i64,
    /// Price delta in minor currency units (cents)
    pub price_adjustment: i64,
    pub is_active: bool,
    pub display_order: i32,
}

/// Save-variant payload (create or update one row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemVariantSave {
    pub gender: Option<String>,
    pub color_id: Option<i64>,
    pub size_name: String,
    pub size_code: String,
    pub stock_level: Option<i64>,
    pub price_adjustment: Option<i64>,
    pub display_order: Option<i32>,
}

/// Update payload for an existing variant row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemVariantUpdate {
    pub size_name: Option<String>,
    pub stock_level: Option<i64>,
    pub price_adjustment: Option<i64>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

/// Variants of one color, nested inside a gender group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantColorGroup {
    pub color_id: Option<i64>,
    /// "general" for color-independent rows
    pub color_name: String,
    pub color_code: Option<String>,
    pub variants: Vec<ItemVariant>,
}

/// Variants grouped gender → color for table rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantGenderGroup {
    pub gender: String,
    pub colors: Vec<VariantColorGroup>,
}

/// Storefront selection to validate against live variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSelection {
    pub item_sku: String,
    pub gender: Option<String>,
    pub color_id: Option<i64>,
    pub size_code: String,
}

/// Resolved selection with live stock and price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSelection {
    pub variant_id: i64,
    pub item_sku: String,
    pub gender: String,
    pub color_id: Option<i64>,
    pub size_code: String,
    pub stock_level: i64,
    /// Item base price plus the variant adjustment, in cents
    pub unit_price: i64,
    pub in_stock: bool,
}

/// Result of an ensure-matrix repair pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixEnsureReport {
    pub item_sku: String,
    pub colors_created: usize,
    pub variants_created: usize,
    pub variants: Vec<ItemVariant>,
}

/// Result of a stock sync or redistribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSyncResult {
    pub item_sku: String,
    pub stock_quantity: i64,
    pub variant_count: usize,
    /// Set when a decrease could not be fully absorbed (all rows hit zero)
    pub shortfall: i64,
}

/// One rolled-up stock bucket (a gender, a size code, or a color name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub key: String,
    pub stock: i64,
    pub variant_count: usize,
}

/// Per-SKU stock rolled up by each dimension, for the admin table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAggregates {
    pub item_sku: String,
    pub total: i64,
    pub by_gender: Vec<AggregateBucket>,
    pub by_size: Vec<AggregateBucket>,
    pub by_color: Vec<AggregateBucket>,
}

/// Aggregate vs. variant stock, side by side
///
/// `divergent` flags an item whose aggregate drifted from the variant sum
/// since the last sync; it is informational, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    pub item_sku: String,
    pub stock_quantity: i64,
    pub variant_total: i64,
    pub variant_count: usize,
    pub divergent: bool,
}
