//! Color Template Repository

use super::size_template::copy_name;
use super::{RepoError, RepoResult};
use shared::models::{
    ColorTemplate, ColorTemplateCreate, ColorTemplateItem, ColorTemplateItemInput,
    ColorTemplateUpdate, TemplateSummary,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const TEMPLATE_COLUMNS: &str =
    "id, template_name, category, description, is_active, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TemplateSummary>> {
    let rows = sqlx::query_as::<_, TemplateSummary>(
        "SELECT t.id, t.template_name, t.category, t.description, t.is_active,
                (SELECT COUNT(*) FROM color_template_item i WHERE i.template_id = t.id) AS item_count
         FROM color_template t WHERE t.is_active = 1 ORDER BY t.template_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ColorTemplate>> {
    let template = sqlx::query_as::<_, ColorTemplate>(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM color_template WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(template)
}

pub async fn find_items(pool: &SqlitePool, template_id: i64) -> RepoResult<Vec<ColorTemplateItem>> {
    let items = sqlx::query_as::<_, ColorTemplateItem>(
        "SELECT id, template_id, color_name, color_code, display_order
         FROM color_template_item WHERE template_id = ? ORDER BY display_order, id",
    )
    .bind(template_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn create(pool: &SqlitePool, data: ColorTemplateCreate) -> RepoResult<ColorTemplate> {
    if data.template_name.trim().is_empty() {
        return Err(RepoError::Validation("Template name must not be empty".into()));
    }
    let now = now_millis();
    let id = snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO color_template (id, template_name, category, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.template_name.trim())
    .bind(&data.category)
    .bind(&data.description)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_items(&mut tx, id, &data.items).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create color template".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ColorTemplateUpdate,
) -> RepoResult<ColorTemplate> {
    if let Some(name) = &data.template_name {
        if name.trim().is_empty() {
            return Err(RepoError::Validation("Template name must not be empty".into()));
        }
    }

    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE color_template SET
            template_name = COALESCE(?1, template_name),
            category = COALESCE(?2, category),
            description = COALESCE(?3, description),
            is_active = COALESCE(?4, is_active),
            updated_at = ?5
         WHERE id = ?6",
    )
    .bind(data.template_name.as_deref().map(str::trim))
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Color template {id} not found")));
    }

    if let Some(items) = &data.items {
        sqlx::query("DELETE FROM color_template_item WHERE template_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, id, items).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Color template {id} not found")))
}

pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE color_template SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Copy a template and all of its item rows under a new id
pub async fn duplicate(pool: &SqlitePool, id: i64) -> RepoResult<ColorTemplate> {
    let source = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Color template {id} not found")))?;

    let name = copy_name(&source.template_name);
    let items = find_items(pool, id).await?;

    let now = now_millis();
    let new_id = snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO color_template (id, template_name, category, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(new_id)
    .bind(&name)
    .bind(&source.category)
    .bind(&source.description)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in &items {
        sqlx::query(
            "INSERT INTO color_template_item (id, template_id, color_name, color_code, display_order)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(new_id)
        .bind(&item.color_name)
        .bind(&item.color_code)
        .bind(item.display_order)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_id(pool, new_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to duplicate color template".into()))
}

async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    template_id: i64,
    items: &[ColorTemplateItemInput],
) -> RepoResult<()> {
    for (idx, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO color_template_item (id, template_id, color_name, color_code, display_order)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(template_id)
        .bind(&item.color_name)
        .bind(&item.color_code)
        .bind(item.display_order.unwrap_or(idx as i32))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
