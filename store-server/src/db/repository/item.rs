//! Item & Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, Item, ItemCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ITEM_COLUMNS: &str =
    "id, sku, name, category_id, base_price, stock_quantity, is_active, created_at, updated_at";

pub async fn find_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM item WHERE sku = ? LIMIT 1"
    ))
    .bind(sku)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate) -> RepoResult<Item> {
    if data.sku.trim().is_empty() {
        return Err(RepoError::Validation("Item SKU must not be empty".into()));
    }
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO item (id, sku, name, category_id, base_price, stock_quantity, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.sku)
    .bind(&data.name)
    .bind(data.category_id)
    .bind(data.base_price.unwrap_or(0))
    .bind(data.stock_quantity.unwrap_or(0))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_sku(pool, &data.sku)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

pub async fn update_stock_quantity(
    pool: &SqlitePool,
    sku: &str,
    stock_quantity: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE item SET stock_quantity = ?, updated_at = ? WHERE sku = ?")
        .bind(stock_quantity)
        .bind(now_millis())
        .bind(sku)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {sku} not found")));
    }
    Ok(())
}

// ====== Categories ======

pub async fn find_category_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT id, name, is_active FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

pub async fn create_category(pool: &SqlitePool, name: &str) -> RepoResult<Category> {
    let id = snowflake_id();
    sqlx::query("INSERT INTO category (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    find_category_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}
