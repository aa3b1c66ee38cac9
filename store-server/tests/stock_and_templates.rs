//! Aggregate stock synchronization and template lifecycle

mod common;

use common::*;
use shared::error::ErrorCode;
use shared::models::{ItemVariantUpdate, OptionType, TemplateDeleteOptions};
use store_server::db::repository::{item, variant};
use store_server::options::stock::AggregateFilter;

async fn set_stock(state: &store_server::ServerState, variant_id: i64, level: i64) {
    variant::update(
        &state.db.pool,
        variant_id,
        ItemVariantUpdate {
            size_name: None,
            stock_level: Some(level),
            price_adjustment: None,
            is_active: None,
            display_order: None,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_sync_sets_aggregate_to_variant_sum() {
    let state = test_state().await;
    seed_item(&state, "TEE-200", None).await;
    let sizes = seed_size_template(
        &state,
        "Tee Sizes",
        &[("S", "Small", 0), ("M", "Medium", 0), ("L", "Large", 0)],
    )
    .await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-200")).await;
    state.matrix.ensure_matrix("TEE-200").await.unwrap();

    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-200").await.unwrap();
    for (variant, level) in rows.iter().zip([3, 4, 5]) {
        set_stock(&state, variant.id, level).await;
    }

    let result = state.stock.sync_from_variants("TEE-200").await.unwrap();
    assert_eq!(result.stock_quantity, 12);
    assert_eq!(result.variant_count, 3);
    assert_eq!(result.shortfall, 0);

    let item_row = item::find_by_sku(&state.db.pool, "TEE-200").await.unwrap().unwrap();
    assert_eq!(item_row.stock_quantity, 12);
}

#[tokio::test]
async fn test_distribute_splits_target_evenly() {
    let state = test_state().await;
    seed_item(&state, "TEE-201", None).await;
    let sizes = seed_size_template(
        &state,
        "Tee Sizes",
        &[("S", "Small", 0), ("M", "Medium", 0), ("L", "Large", 0)],
    )
    .await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-201")).await;
    state.matrix.ensure_matrix("TEE-201").await.unwrap();

    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-201").await.unwrap();
    for variant in &rows {
        set_stock(&state, variant.id, 5).await;
    }

    let result = state.stock.distribute_evenly("TEE-201", 9).await.unwrap();
    assert_eq!(result.stock_quantity, 9);
    assert_eq!(result.shortfall, 0);

    let after = variant::find_active_by_sku(&state.db.pool, "TEE-201").await.unwrap();
    let levels: Vec<i64> = after.iter().map(|v| v.stock_level).collect();
    assert_eq!(levels, vec![3, 3, 3]);

    let item_row = item::find_by_sku(&state.db.pool, "TEE-201").await.unwrap().unwrap();
    assert_eq!(item_row.stock_quantity, 9);
}

#[tokio::test]
async fn test_summary_flags_drifted_aggregate() {
    let state = test_state().await;
    seed_item(&state, "TEE-204", None).await;
    let sizes = seed_size_template(&state, "Tee Sizes", &[("S", "Small", 0), ("M", "Medium", 0)]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-204")).await;
    state.matrix.ensure_matrix("TEE-204").await.unwrap();

    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-204").await.unwrap();
    for variant in &rows {
        set_stock(&state, variant.id, 6).await;
    }

    // Aggregate was never synced, so it lags behind the variant sum
    let drifted = state.stock.summary("TEE-204").await.unwrap();
    assert_eq!(drifted.variant_total, 12);
    assert_eq!(drifted.stock_quantity, 0);
    assert!(drifted.divergent);

    state.stock.sync_from_variants("TEE-204").await.unwrap();
    let synced = state.stock.summary("TEE-204").await.unwrap();
    assert_eq!(synced.stock_quantity, 12);
    assert!(!synced.divergent);
}

#[tokio::test]
async fn test_aggregates_roll_up_by_dimension() {
    let state = test_state().await;
    seed_item(&state, "TEE-205", None).await;
    let sizes = seed_size_template(&state, "Tee Sizes", &[("S", "Small", 0), ("M", "Medium", 0)]).await;
    let colors = seed_color_template(&state, "Basics", &[("Red", "#f00"), ("Blue", "#00f")]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-205")).await;
    assign_template(&state, OptionType::ColorTemplate, colors.template.id, sku_target("TEE-205")).await;
    state.matrix.ensure_matrix("TEE-205").await.unwrap();

    let item_colors = variant::find_colors(&state.db.pool, "TEE-205").await.unwrap();
    let red = item_colors.iter().find(|c| c.color_name == "Red").unwrap().id;
    for v in variant::find_active_by_sku(&state.db.pool, "TEE-205").await.unwrap() {
        let level = match (v.color_id == Some(red), v.size_code.as_str()) {
            (true, "S") => 1,
            (true, "M") => 2,
            (false, "S") => 3,
            _ => 4,
        };
        set_stock(&state, v.id, level).await;
    }

    let all = state
        .stock
        .aggregates("TEE-205", &AggregateFilter::default())
        .await
        .unwrap();
    assert_eq!(all.total, 10);
    let bucket = |buckets: &[shared::models::AggregateBucket], key: &str| {
        buckets.iter().find(|b| b.key == key).map(|b| b.stock)
    };
    assert_eq!(bucket(&all.by_size, "S"), Some(4));
    assert_eq!(bucket(&all.by_size, "M"), Some(6));
    assert_eq!(bucket(&all.by_color, "Red"), Some(3));
    assert_eq!(bucket(&all.by_color, "Blue"), Some(7));
    assert_eq!(bucket(&all.by_gender, "Unisex"), Some(10));

    let only_red = state
        .stock
        .aggregates(
            "TEE-205",
            &AggregateFilter {
                color_id: Some(red),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(only_red.total, 3);
    assert_eq!(bucket(&only_red.by_size, "S"), Some(1));

    let only_small = state
        .stock
        .aggregates(
            "TEE-205",
            &AggregateFilter {
                size_code: Some("S".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(only_small.total, 4);
}

#[tokio::test]
async fn test_distribute_rejects_negative_target() {
    let state = test_state().await;
    seed_item(&state, "TEE-202", None).await;
    let err = state.stock.distribute_evenly("TEE-202", -1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NegativeStock);
}

#[tokio::test]
async fn test_distribute_without_variants_writes_aggregate() {
    let state = test_state().await;
    seed_item(&state, "TEE-203", None).await;

    let result = state.stock.distribute_evenly("TEE-203", 25).await.unwrap();
    assert_eq!(result.stock_quantity, 25);
    assert_eq!(result.variant_count, 0);

    let item_row = item::find_by_sku(&state.db.pool, "TEE-203").await.unwrap().unwrap();
    assert_eq!(item_row.stock_quantity, 25);
}

#[tokio::test]
async fn test_duplicate_template_copies_all_rows() {
    let state = test_state().await;
    let original = seed_size_template(
        &state,
        "Adult Tees",
        &[("S", "Small", 0), ("M", "Medium", 0), ("L", "Large", 100)],
    )
    .await;

    let copy = state
        .templates
        .duplicate_size_template(original.template.id)
        .await
        .unwrap();

    assert_ne!(copy.template.id, original.template.id);
    assert_eq!(copy.template.template_name, "Copy of Adult Tees");
    assert_eq!(copy.items.len(), 3);
    for (copied, source) in copy.items.iter().zip(original.items.iter()) {
        assert_ne!(copied.id, source.id);
        assert_eq!(copied.size_code, source.size_code);
        assert_eq!(copied.price_adjustment, source.price_adjustment);
        assert_eq!(copied.display_order, source.display_order);
    }
}

#[tokio::test]
async fn test_duplicate_clamps_multibyte_name_on_char_boundary() {
    let state = test_state().await;
    // "Copy of " (8 bytes) plus this name puts byte 100 inside a character
    let long_name = format!("L{}", "é".repeat(50));
    let original = seed_size_template(&state, &long_name, &[("S", "Small", 0)]).await;

    let copy = state
        .templates
        .duplicate_size_template(original.template.id)
        .await
        .unwrap();

    assert!(copy.template.template_name.starts_with("Copy of L"));
    assert!(copy.template.template_name.len() <= 100);
    assert!(copy.template.template_name.ends_with('é'));
    assert_eq!(copy.items.len(), 1);
}

#[tokio::test]
async fn test_empty_template_is_rejected() {
    let state = test_state().await;
    let err = state
        .templates
        .create_size_template(shared::models::SizeTemplateCreate {
            template_name: "Empty".into(),
            category: None,
            description: None,
            items: Vec::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TemplateEmpty);
}

#[tokio::test]
async fn test_delete_assigned_template_is_blocked() {
    let state = test_state().await;
    for sku in ["TEE-210", "TEE-211", "TEE-212"] {
        seed_item(&state, sku, None).await;
    }
    let palette = seed_color_template(&state, "Spring", &[("Pink", "#fcc"), ("Mint", "#cfc")]).await;
    for sku in ["TEE-210", "TEE-211", "TEE-212"] {
        assign_template(&state, OptionType::ColorTemplate, palette.template.id, sku_target(sku)).await;
    }

    let err = state
        .templates
        .delete_color_template(palette.template.id, TemplateDeleteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TemplateInUse);
    let details = err.details.unwrap();
    assert_eq!(details["affected_count"], serde_json::json!(3));

    // Nothing changed: template is still live and the links still point at it
    let still = state.templates.get_color_template(palette.template.id).await.unwrap();
    assert!(still.template.is_active);
    let links = state.templates.list_for_target(sku_target("TEE-210")).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].option_id, Some(palette.template.id));
}

#[tokio::test]
async fn test_delete_with_remap_moves_links() {
    let state = test_state().await;
    for sku in ["TEE-220", "TEE-221"] {
        seed_item(&state, sku, None).await;
    }
    let old = seed_color_template(&state, "Spring", &[("Pink", "#fcc")]).await;
    let replacement = seed_color_template(&state, "Summer", &[("Coral", "#f88")]).await;
    for sku in ["TEE-220", "TEE-221"] {
        assign_template(&state, OptionType::ColorTemplate, old.template.id, sku_target(sku)).await;
    }

    state
        .templates
        .delete_color_template(
            old.template.id,
            TemplateDeleteOptions {
                force_remap_to: Some(replacement.template.id),
            },
        )
        .await
        .unwrap();

    let gone = state.templates.get_color_template(old.template.id).await.unwrap();
    assert!(!gone.template.is_active);

    for sku in ["TEE-220", "TEE-221"] {
        let links = state.templates.list_for_target(sku_target(sku)).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].option_id, Some(replacement.template.id));
        assert_eq!(links[0].option_label, "Summer");
    }
}
