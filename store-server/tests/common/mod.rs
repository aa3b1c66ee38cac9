//! Shared helpers for integration tests

#![allow(dead_code)]

use shared::models::{
    AssignmentTarget, Category, ColorTemplateCreate, ColorTemplateDetail, ColorTemplateItemInput,
    Item, ItemCreate, OptionAssignmentCreate, OptionType, SizeTemplateCreate, SizeTemplateDetail,
    SizeTemplateItemInput,
};
use store_server::db::repository::item;
use store_server::db::DbService;
use store_server::{Config, ServerState};

pub async fn test_state() -> ServerState {
    // TTL 0 disables the resolver cache so tests observe writes immediately
    test_state_with_ttl(0).await
}

pub async fn test_state_with_ttl(ttl_ms: u64) -> ServerState {
    let db = DbService::in_memory().await.expect("in-memory db");
    let config = Config {
        database_path: ":memory:".into(),
        http_port: 0,
        environment: "test".into(),
        options_cache_ttl_ms: ttl_ms,
    };
    ServerState::with_db(config, db)
}

pub async fn seed_category(state: &ServerState, name: &str) -> Category {
    item::create_category(&state.db.pool, name).await.expect("category")
}

pub async fn seed_item(state: &ServerState, sku: &str, category_id: Option<i64>) -> Item {
    item::create(
        &state.db.pool,
        ItemCreate {
            sku: sku.into(),
            name: format!("Item {sku}"),
            category_id,
            base_price: Some(1999),
            stock_quantity: None,
        },
    )
    .await
    .expect("item")
}

/// Sizes given as (code, name, price_adjustment)
pub async fn seed_size_template(
    state: &ServerState,
    name: &str,
    sizes: &[(&str, &str, i64)],
) -> SizeTemplateDetail {
    state
        .templates
        .create_size_template(SizeTemplateCreate {
            template_name: name.into(),
            category: None,
            description: None,
            items: sizes
                .iter()
                .enumerate()
                .map(|(i, (code, label, adj))| SizeTemplateItemInput {
                    size_name: (*label).into(),
                    size_code: (*code).into(),
                    price_adjustment: Some(*adj),
                    display_order: Some(i as i32),
                })
                .collect(),
        })
        .await
        .expect("size template")
}

/// Colors given as (name, code)
pub async fn seed_color_template(
    state: &ServerState,
    name: &str,
    colors: &[(&str, &str)],
) -> ColorTemplateDetail {
    state
        .templates
        .create_color_template(ColorTemplateCreate {
            template_name: name.into(),
            category: None,
            description: None,
            items: colors
                .iter()
                .enumerate()
                .map(|(i, (color_name, code))| ColorTemplateItemInput {
                    color_name: (*color_name).into(),
                    color_code: (*code).into(),
                    display_order: Some(i as i32),
                })
                .collect(),
        })
        .await
        .expect("color template")
}

pub async fn assign_template(
    state: &ServerState,
    option_type: OptionType,
    template_id: i64,
    target: AssignmentTarget,
) {
    state
        .templates
        .assign(OptionAssignmentCreate {
            option_type,
            option_id: Some(template_id),
            option_label: None,
            target,
        })
        .await
        .expect("assign");
}

pub fn sku_target(sku: &str) -> AssignmentTarget {
    AssignmentTarget::Sku {
        item_sku: sku.into(),
    }
}

pub fn category_target(category_id: i64) -> AssignmentTarget {
    AssignmentTarget::Category { category_id }
}
