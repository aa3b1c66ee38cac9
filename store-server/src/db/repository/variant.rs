//! Item Variant & Item Color Repository

use super::{RepoError, RepoResult};
use shared::models::{ItemColor, ItemVariant, ItemVariantUpdate};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const VARIANT_COLUMNS: &str =
    "id, item_sku, gender, color_id, size_name, size_code, stock_level, price_adjustment, is_active, display_order";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ItemVariant>> {
    let variant = sqlx::query_as::<_, ItemVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM item_variant WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(variant)
}

pub async fn find_active_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<Vec<ItemVariant>> {
    let variants = sqlx::query_as::<_, ItemVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM item_variant
         WHERE item_sku = ? AND is_active = 1
         ORDER BY IFNULL(gender, 'Unisex'), IFNULL(color_id, 0), display_order, id"
    ))
    .bind(sku)
    .fetch_all(pool)
    .await?;
    Ok(variants)
}

/// Match one active variant by its slot; gender NULL and 'Unisex' are the same slot
pub async fn find_by_slot(
    pool: &SqlitePool,
    sku: &str,
    gender: Option<&str>,
    color_id: Option<i64>,
    size_code: &str,
) -> RepoResult<Option<ItemVariant>> {
    let variant = sqlx::query_as::<_, ItemVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM item_variant
         WHERE item_sku = ? AND is_active = 1
           AND IFNULL(gender, 'Unisex') = IFNULL(?, 'Unisex')
           AND IFNULL(color_id, 0) = IFNULL(?, 0)
           AND size_code = ?
         LIMIT 1"
    ))
    .bind(sku)
    .bind(gender)
    .bind(color_id)
    .bind(size_code)
    .fetch_optional(pool)
    .await?;
    Ok(variant)
}

/// Insert a variant slot if it does not exist yet
///
/// Two concurrent ensure calls can both decide the slot is missing; the
/// partial unique index turns the second insert into a no-op.
#[allow(clippy::too_many_arguments)]
pub async fn insert_slot(
    pool: &SqlitePool,
    sku: &str,
    gender: Option<&str>,
    color_id: Option<i64>,
    size_name: &str,
    size_code: &str,
    stock_level: i64,
    price_adjustment: i64,
    display_order: i32,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO item_variant
            (id, item_sku, gender, color_id, size_name, size_code, stock_level, price_adjustment, display_order)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(sku)
    .bind(gender)
    .bind(color_id)
    .bind(size_name)
    .bind(size_code)
    .bind(stock_level)
    .bind(price_adjustment)
    .bind(display_order)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update(pool: &SqlitePool, id: i64, data: ItemVariantUpdate) -> RepoResult<ItemVariant> {
    if matches!(data.stock_level, Some(s) if s < 0) {
        return Err(RepoError::Validation("Stock level may not be negative".into()));
    }
    let rows = sqlx::query(
        "UPDATE item_variant SET
            size_name = COALESCE(?1, size_name),
            stock_level = COALESCE(?2, stock_level),
            price_adjustment = COALESCE(?3, price_adjustment),
            is_active = COALESCE(?4, is_active),
            display_order = COALESCE(?5, display_order)
         WHERE id = ?6",
    )
    .bind(&data.size_name)
    .bind(data.stock_level)
    .bind(data.price_adjustment)
    .bind(data.is_active)
    .bind(data.display_order)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Variant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Variant {id} not found")))
}

pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE item_variant SET is_active = 0 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Deactivate every active variant of the given colors (None = "general" rows)
pub async fn deactivate_for_colors(
    pool: &SqlitePool,
    sku: &str,
    color_ids: &[Option<i64>],
) -> RepoResult<u64> {
    let mut total = 0;
    for color_id in color_ids {
        let rows = sqlx::query(
            "UPDATE item_variant SET is_active = 0
             WHERE item_sku = ? AND is_active = 1 AND IFNULL(color_id, 0) = IFNULL(?, 0)",
        )
        .bind(sku)
        .bind(color_id)
        .execute(pool)
        .await?;
        total += rows.rows_affected();
    }
    Ok(total)
}

pub async fn sum_active_stock(pool: &SqlitePool, sku: &str) -> RepoResult<i64> {
    let sum = sqlx::query_scalar::<_, i64>(
        "SELECT IFNULL(SUM(stock_level), 0) FROM item_variant WHERE item_sku = ? AND is_active = 1",
    )
    .bind(sku)
    .fetch_one(pool)
    .await?;
    Ok(sum)
}

/// Write a batch of stock levels in one transaction
pub async fn set_stock_levels(pool: &SqlitePool, levels: &[(i64, i64)]) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    for (id, level) in levels {
        if *level < 0 {
            return Err(RepoError::Validation("Stock level may not be negative".into()));
        }
        sqlx::query("UPDATE item_variant SET stock_level = ? WHERE id = ?")
            .bind(level)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Highest display_order within one (gender, color) group
pub async fn max_display_order(
    pool: &SqlitePool,
    sku: &str,
    gender: Option<&str>,
    color_id: Option<i64>,
) -> RepoResult<i32> {
    let max = sqlx::query_scalar::<_, i32>(
        "SELECT IFNULL(MAX(display_order), -1) FROM item_variant
         WHERE item_sku = ?
           AND IFNULL(gender, 'Unisex') = IFNULL(?, 'Unisex')
           AND IFNULL(color_id, 0) = IFNULL(?, 0)",
    )
    .bind(sku)
    .bind(gender)
    .bind(color_id)
    .fetch_one(pool)
    .await?;
    Ok(max)
}

/// Distinct genders on active variants, NULL reported as 'Unisex'
pub async fn distinct_genders(pool: &SqlitePool, sku: &str) -> RepoResult<Vec<String>> {
    let genders = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT IFNULL(gender, 'Unisex') FROM item_variant
         WHERE item_sku = ? AND is_active = 1
         ORDER BY 1",
    )
    .bind(sku)
    .fetch_all(pool)
    .await?;
    Ok(genders)
}

// ====== Item colors ======

pub async fn find_colors(pool: &SqlitePool, sku: &str) -> RepoResult<Vec<ItemColor>> {
    let colors = sqlx::query_as::<_, ItemColor>(
        "SELECT id, item_sku, color_name, color_code, is_active, display_order
         FROM item_color WHERE item_sku = ? AND is_active = 1
         ORDER BY display_order, id",
    )
    .bind(sku)
    .fetch_all(pool)
    .await?;
    Ok(colors)
}

pub async fn find_color_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ItemColor>> {
    let color = sqlx::query_as::<_, ItemColor>(
        "SELECT id, item_sku, color_name, color_code, is_active, display_order
         FROM item_color WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(color)
}

/// Get or create the item color row for a name, returning its id
pub async fn ensure_color(
    pool: &SqlitePool,
    sku: &str,
    color_name: &str,
    color_code: &str,
    display_order: i32,
) -> RepoResult<i64> {
    sqlx::query(
        "INSERT OR IGNORE INTO item_color (id, item_sku, color_name, color_code, display_order)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(sku)
    .bind(color_name)
    .bind(color_code)
    .bind(display_order)
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM item_color WHERE item_sku = ? AND color_name = ? AND is_active = 1",
    )
    .bind(sku)
    .bind(color_name)
    .fetch_one(pool)
    .await
    .map_err(|_| RepoError::Database(format!("Failed to ensure color {color_name} for {sku}")))?;
    Ok(id)
}
