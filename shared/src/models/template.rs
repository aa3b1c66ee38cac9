//! Size & Color Template Models

use serde::{Deserialize, Serialize};

/// Size template entity (reusable size set, e.g. "Adult Tees")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SizeTemplate {
    pub id: i64,
    pub template_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Size template item row
///
/// `size_code` is unique within one template; `display_order` defines
/// presentation order only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SizeTemplateItem {
    pub id: i64,
    pub template_id: i64,
    pub size_name: String,
    pub size_code: String,
    /// Price delta in minor currency units (cents)
    pub price_adjustment: i64,
    pub display_order: i32,
}

/// Color template entity (reusable color set)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ColorTemplate {
    pub id: i64,
    pub template_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Color template item row
///
/// `color_name` is unique within one template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ColorTemplateItem {
    pub id: i64,
    pub template_id: i64,
    pub color_name: String,
    /// Hex value ("#1a2b3c") or named color
    pub color_code: String,
    pub display_order: i32,
}

/// Size template with its item rows (for detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeTemplateDetail {
    #[serde(flatten)]
    pub template: SizeTemplate,
    pub items: Vec<SizeTemplateItem>,
}

/// Color template with its item rows (for detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorTemplateDetail {
    #[serde(flatten)]
    pub template: ColorTemplate,
    pub items: Vec<ColorTemplateItem>,
}

/// Template summary with item count (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TemplateSummary {
    pub id: i64,
    pub template_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub item_count: i64,
}

/// Input row for creating/updating size template items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeTemplateItemInput {
    pub size_name: String,
    pub size_code: String,
    pub price_adjustment: Option<i64>,
    pub display_order: Option<i32>,
}

/// Input row for creating/updating color template items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorTemplateItemInput {
    pub color_name: String,
    pub color_code: String,
    pub display_order: Option<i32>,
}

/// Create size template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeTemplateCreate {
    pub template_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub items: Vec<SizeTemplateItemInput>,
}

/// Update size template payload (replaces item rows when `items` is present)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeTemplateUpdate {
    pub template_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub items: Option<Vec<SizeTemplateItemInput>>,
}

/// Create color template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorTemplateCreate {
    pub template_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub items: Vec<ColorTemplateItemInput>,
}

/// Update color template payload (replaces item rows when `items` is present)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorTemplateUpdate {
    pub template_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub items: Option<Vec<ColorTemplateItemInput>>,
}

/// Delete options for a template still in use
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateDeleteOptions {
    /// Remap live assignments to this template before deleting
    pub force_remap_to: Option<i64>,
}

/// How a size template is expanded onto an item's colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Generate the new sizes for every color in use on the item
    #[default]
    AllColors,
    /// Generate the new sizes for a single color only
    ColorSpecific,
}

/// Apply-template-to-item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyTemplateRequest {
    pub item_sku: String,
    #[serde(default)]
    pub apply_mode: ApplyMode,
    /// Target color; required when `apply_mode` is `color_specific`
    pub color_id: Option<i64>,
    /// Deactivate prior variants for the affected colors first
    #[serde(default)]
    pub replace_existing: bool,
    /// Initial stock for newly generated variants
    #[serde(default)]
    pub default_stock: i64,
}

/// Result of applying a template to an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyTemplateResult {
    pub assignment_id: i64,
    pub variants_created: usize,
    pub variants_deactivated: usize,
}
