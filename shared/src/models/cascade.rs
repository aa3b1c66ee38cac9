//! Option Cascade Models
//!
//! Settings control which dimensions an item exposes and in which order the
//! resolver walks them; `EffectiveOptions` is the derived, per-request result.

use serde::{Deserialize, Serialize};

/// Option dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Gender,
    Size,
    Color,
}

impl Dimension {
    /// Default cascade walk order
    pub const DEFAULT_ORDER: [Dimension; 3] =
        [Dimension::Gender, Dimension::Size, Dimension::Color];
}

/// Which configuration tier a settings row (or a resolved dimension) came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum CascadeSource {
    Sku,
    Category,
    System,
}

/// Cascade settings row, scoped to a SKU, a category, or the system default
///
/// `cascade_order` and `enabled_dimensions` are stored as JSON arrays;
/// `grouping_rules` is opaque structured data passed through to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSettings {
    pub id: i64,
    pub scope: CascadeSource,
    pub item_sku: Option<String>,
    pub category_id: Option<i64>,
    pub cascade_order: Vec<Dimension>,
    pub enabled_dimensions: Vec<Dimension>,
    pub grouping_rules: Option<serde_json::Value>,
    pub is_active: bool,
    pub updated_at: i64,
}

impl OptionSettings {
    pub fn is_enabled(&self, dim: Dimension) -> bool {
        self.enabled_dimensions.contains(&dim)
    }
}

/// Upsert payload for cascade settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSettingsUpsert {
    pub scope: CascadeSource,
    pub item_sku: Option<String>,
    pub category_id: Option<i64>,
    pub cascade_order: Option<Vec<Dimension>>,
    pub enabled_dimensions: Option<Vec<Dimension>>,
    pub grouping_rules: Option<serde_json::Value>,
}

/// Resolved color option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub code: String,
}

/// Resolved size option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub code: String,
    pub name: String,
    pub price_adjustment: i64,
}

/// Effective option lists for one SKU
///
/// Derived per request, never persisted. Empty lists mean "no constraint from
/// this dimension", not "no variants". `source` records which tier satisfied
/// the last resolved dimension (UI provenance only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveOptions {
    pub genders: Vec<String>,
    pub colors: Vec<ColorOption>,
    pub sizes: Vec<SizeOption>,
    pub source: CascadeSource,
}

impl EffectiveOptions {
    pub fn empty() -> Self {
        Self {
            genders: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            source: CascadeSource::System,
        }
    }
}
