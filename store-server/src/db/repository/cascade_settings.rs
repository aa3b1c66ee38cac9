//! Cascade Settings Repository
//!
//! Settings rows are scoped sku / category / system; JSON array columns are
//! decoded here so callers only see typed [`OptionSettings`].

use super::{RepoError, RepoResult};
use shared::models::{CascadeSource, Dimension, OptionSettings, OptionSettingsUpsert};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct SettingsRow {
    id: i64,
    scope: CascadeSource,
    item_sku: Option<String>,
    category_id: Option<i64>,
    cascade_order: String,
    enabled_dimensions: String,
    grouping_rules: Option<String>,
    is_active: bool,
    updated_at: i64,
}

impl SettingsRow {
    fn decode(self) -> OptionSettings {
        let cascade_order = decode_dimensions(&self.cascade_order, self.id, "cascade_order");
        let enabled_dimensions =
            decode_dimensions(&self.enabled_dimensions, self.id, "enabled_dimensions");
        let grouping_rules = self
            .grouping_rules
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());
        OptionSettings {
            id: self.id,
            scope: self.scope,
            item_sku: self.item_sku,
            category_id: self.category_id,
            cascade_order,
            enabled_dimensions,
            grouping_rules,
            is_active: self.is_active,
            updated_at: self.updated_at,
        }
    }
}

// A malformed JSON column degrades to an empty list instead of failing the
// request, but is logged so the data problem stays visible.
fn decode_dimensions(raw: &str, row_id: i64, column: &str) -> Vec<Dimension> {
    match serde_json::from_str(raw) {
        Ok(dims) => dims,
        Err(e) => {
            tracing::warn!(row_id, column, error = %e, "Malformed dimension list in settings row");
            Vec::new()
        }
    }
}

const SETTINGS_COLUMNS: &str =
    "id, scope, item_sku, category_id, cascade_order, enabled_dimensions, grouping_rules, is_active, updated_at";

/// The live settings row for one scope target, if any
pub async fn find_for_scope(
    pool: &SqlitePool,
    scope: CascadeSource,
    item_sku: Option<&str>,
    category_id: Option<i64>,
) -> RepoResult<Option<OptionSettings>> {
    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM item_option_cascade_settings
         WHERE is_active = 1 AND scope = ?
           AND IFNULL(item_sku, '') = IFNULL(?, '')
           AND IFNULL(category_id, 0) = IFNULL(?, 0)
         LIMIT 1"
    ))
    .bind(scope)
    .bind(item_sku)
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(SettingsRow::decode))
}

/// Create or replace the live settings row for the given scope target
pub async fn upsert(pool: &SqlitePool, data: OptionSettingsUpsert) -> RepoResult<OptionSettings> {
    match data.scope {
        CascadeSource::Sku if data.item_sku.is_none() => {
            return Err(RepoError::Validation("SKU-scoped settings need item_sku".into()));
        }
        CascadeSource::Category if data.category_id.is_none() => {
            return Err(RepoError::Validation(
                "Category-scoped settings need category_id".into(),
            ));
        }
        _ => {}
    }

    let existing = find_for_scope(
        pool,
        data.scope,
        data.item_sku.as_deref(),
        data.category_id,
    )
    .await?;

    let cascade_order = data
        .cascade_order
        .or_else(|| existing.as_ref().map(|s| s.cascade_order.clone()))
        .unwrap_or_default();
    let enabled_dimensions = data
        .enabled_dimensions
        .or_else(|| existing.as_ref().map(|s| s.enabled_dimensions.clone()))
        .unwrap_or_default();
    let grouping_rules = data
        .grouping_rules
        .or_else(|| existing.as_ref().and_then(|s| s.grouping_rules.clone()));

    let order_json = serde_json::to_string(&cascade_order)
        .map_err(|e| RepoError::Validation(format!("Bad cascade_order: {e}")))?;
    let enabled_json = serde_json::to_string(&enabled_dimensions)
        .map_err(|e| RepoError::Validation(format!("Bad enabled_dimensions: {e}")))?;
    let rules_json = grouping_rules
        .as_ref()
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(|e| RepoError::Validation(format!("Bad grouping_rules: {e}")))?;
    let now = now_millis();

    let id = if let Some(existing) = existing {
        sqlx::query(
            "UPDATE item_option_cascade_settings
             SET cascade_order = ?, enabled_dimensions = ?, grouping_rules = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&order_json)
        .bind(&enabled_json)
        .bind(&rules_json)
        .bind(now)
        .bind(existing.id)
        .execute(pool)
        .await?;
        existing.id
    } else {
        let id = snowflake_id();
        sqlx::query(
            "INSERT INTO item_option_cascade_settings
                (id, scope, item_sku, category_id, cascade_order, enabled_dimensions, grouping_rules, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(data.scope)
        .bind(&data.item_sku)
        .bind(data.category_id)
        .bind(&order_json)
        .bind(&enabled_json)
        .bind(&rules_json)
        .bind(now)
        .execute(pool)
        .await?;
        id
    };

    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM item_option_cascade_settings WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(row.decode())
}

/// Soft-delete the live settings row for a scope target
pub async fn soft_delete_for_scope(
    pool: &SqlitePool,
    scope: CascadeSource,
    item_sku: Option<&str>,
    category_id: Option<i64>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE item_option_cascade_settings SET is_active = 0, updated_at = ?
         WHERE is_active = 1 AND scope = ?
           AND IFNULL(item_sku, '') = IFNULL(?, '')
           AND IFNULL(category_id, 0) = IFNULL(?, 0)",
    )
    .bind(now_millis())
    .bind(scope)
    .bind(item_sku)
    .bind(category_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
