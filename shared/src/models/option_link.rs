//! Option Assignment Models
//!
//! An assignment links a template (or an ad-hoc material label) to a target:
//! a specific SKU or a whole category.

use serde::{Deserialize, Serialize};

/// What kind of option a link carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OptionType {
    SizeTemplate,
    ColorTemplate,
    Material,
}

/// What kind of target a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AppliesTo {
    Sku,
    Category,
}

/// Assignment target, carrying only the fields valid for its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "applies_to_type", rename_all = "snake_case")]
pub enum AssignmentTarget {
    Sku { item_sku: String },
    Category { category_id: i64 },
}

impl AssignmentTarget {
    pub fn applies_to(&self) -> AppliesTo {
        match self {
            AssignmentTarget::Sku { .. } => AppliesTo::Sku,
            AssignmentTarget::Category { .. } => AppliesTo::Category,
        }
    }
}

/// Option assignment record
///
/// Exactly one of `item_sku`/`category_id` is set, matching `applies_to_type`.
/// For template links `option_id` references the template; for materials it is
/// null and `option_label` carries the material name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OptionAssignment {
    pub id: i64,
    pub option_type: OptionType,
    pub option_id: Option<i64>,
    pub option_label: String,
    pub applies_to_type: AppliesTo,
    pub item_sku: Option<String>,
    pub category_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Option assignment with resolved category name (for display)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OptionAssignmentView {
    pub id: i64,
    pub option_type: OptionType,
    pub option_id: Option<i64>,
    pub option_label: String,
    pub applies_to_type: AppliesTo,
    pub item_sku: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub is_active: bool,
}

/// Create assignment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionAssignmentCreate {
    pub option_type: OptionType,
    /// Template id; required unless `option_type` is `material`
    pub option_id: Option<i64>,
    /// Material name; required when `option_type` is `material`
    pub option_label: Option<String>,
    #[serde(flatten)]
    pub target: AssignmentTarget,
}
