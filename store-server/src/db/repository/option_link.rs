//! Option Assignment Repository
//!
//! One live link per (option_type, target); assigning again replaces the
//! previous link by deactivating it first.

use super::{RepoError, RepoResult};
use shared::models::{AssignmentTarget, OptionAssignment, OptionAssignmentView, OptionType};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const LINK_COLUMNS: &str =
    "id, option_type, option_id, option_label, applies_to_type, item_sku, category_id, is_active, created_at";

fn target_binds(target: &AssignmentTarget) -> (Option<&str>, Option<i64>) {
    match target {
        AssignmentTarget::Sku { item_sku } => (Some(item_sku.as_str()), None),
        AssignmentTarget::Category { category_id } => (None, Some(*category_id)),
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OptionAssignment>> {
    let link = sqlx::query_as::<_, OptionAssignment>(&format!(
        "SELECT {LINK_COLUMNS} FROM inventory_option_link WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(link)
}

/// Live links for one target, all option types
pub async fn find_for_target(
    pool: &SqlitePool,
    target: &AssignmentTarget,
) -> RepoResult<Vec<OptionAssignment>> {
    let (sku, category_id) = target_binds(target);
    let links = sqlx::query_as::<_, OptionAssignment>(&format!(
        "SELECT {LINK_COLUMNS} FROM inventory_option_link
         WHERE is_active = 1 AND applies_to_type = ?
           AND IFNULL(item_sku, '') = IFNULL(?, '')
           AND IFNULL(category_id, 0) = IFNULL(?, 0)
         ORDER BY created_at"
    ))
    .bind(target.applies_to())
    .bind(sku)
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(links)
}

/// The live link of one option type for one target, if any
pub async fn find_active(
    pool: &SqlitePool,
    option_type: OptionType,
    target: &AssignmentTarget,
) -> RepoResult<Option<OptionAssignment>> {
    let (sku, category_id) = target_binds(target);
    let link = sqlx::query_as::<_, OptionAssignment>(&format!(
        "SELECT {LINK_COLUMNS} FROM inventory_option_link
         WHERE is_active = 1 AND option_type = ? AND applies_to_type = ?
           AND IFNULL(item_sku, '') = IFNULL(?, '')
           AND IFNULL(category_id, 0) = IFNULL(?, 0)
         LIMIT 1"
    ))
    .bind(option_type)
    .bind(target.applies_to())
    .bind(sku)
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    Ok(link)
}

/// Live links with resolved category names, for display
pub async fn find_views_for_sku(
    pool: &SqlitePool,
    item_sku: &str,
    category_id: Option<i64>,
) -> RepoResult<Vec<OptionAssignmentView>> {
    let links = sqlx::query_as::<_, OptionAssignmentView>(
        "SELECT l.id, l.option_type, l.option_id, l.option_label, l.applies_to_type,
                l.item_sku, l.category_id, c.name AS category_name, l.is_active
         FROM inventory_option_link l
         LEFT JOIN category c ON c.id = l.category_id
         WHERE l.is_active = 1
           AND (l.item_sku = ?1 OR (?2 IS NOT NULL AND l.category_id = ?2))
         ORDER BY l.applies_to_type, l.created_at",
    )
    .bind(item_sku)
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(links)
}

/// Create a link, replacing any live link of the same type for the target
pub async fn upsert(
    pool: &SqlitePool,
    option_type: OptionType,
    option_id: Option<i64>,
    option_label: &str,
    target: &AssignmentTarget,
) -> RepoResult<OptionAssignment> {
    let (sku, category_id) = target_binds(target);
    let id = snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE inventory_option_link SET is_active = 0
         WHERE is_active = 1 AND option_type = ? AND applies_to_type = ?
           AND IFNULL(item_sku, '') = IFNULL(?, '')
           AND IFNULL(category_id, 0) = IFNULL(?, 0)",
    )
    .bind(option_type)
    .bind(target.applies_to())
    .bind(sku)
    .bind(category_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO inventory_option_link
            (id, option_type, option_id, option_label, applies_to_type, item_sku, category_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(option_type)
    .bind(option_id)
    .bind(option_label)
    .bind(target.applies_to())
    .bind(sku)
    .bind(category_id)
    .bind(now_millis())
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create option link".into()))
}

pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE inventory_option_link SET is_active = 0 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Drop every live link of one option type for a target
pub async fn clear_for_target(
    pool: &SqlitePool,
    option_type: OptionType,
    target: &AssignmentTarget,
) -> RepoResult<u64> {
    let (sku, category_id) = target_binds(target);
    let rows = sqlx::query(
        "UPDATE inventory_option_link SET is_active = 0
         WHERE is_active = 1 AND option_type = ? AND applies_to_type = ?
           AND IFNULL(item_sku, '') = IFNULL(?, '')
           AND IFNULL(category_id, 0) = IFNULL(?, 0)",
    )
    .bind(option_type)
    .bind(target.applies_to())
    .bind(sku)
    .bind(category_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Number of live links referencing a template
pub async fn count_active_by_template(
    pool: &SqlitePool,
    option_type: OptionType,
    template_id: i64,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM inventory_option_link
         WHERE is_active = 1 AND option_type = ? AND option_id = ?",
    )
    .bind(option_type)
    .bind(template_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Point every live link at a replacement template
pub async fn remap_template(
    pool: &SqlitePool,
    option_type: OptionType,
    from_id: i64,
    to_id: i64,
    to_label: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE inventory_option_link SET option_id = ?, option_label = ?
         WHERE is_active = 1 AND option_type = ? AND option_id = ?",
    )
    .bind(to_id)
    .bind(to_label)
    .bind(option_type)
    .bind(from_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
