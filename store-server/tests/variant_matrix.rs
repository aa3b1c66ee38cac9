//! Variant matrix generation, repair, and storefront selection

mod common;

use common::*;
use shared::error::ErrorCode;
use shared::models::{
    ApplyMode, ApplyTemplateRequest, CascadeSource, Dimension, ItemVariantUpdate,
    OptionSettingsUpsert, OptionType, SizeTemplateItemInput, SizeTemplateUpdate, VariantSelection,
};
use store_server::db::repository::variant;

#[tokio::test]
async fn test_ensure_matrix_builds_full_cross_product() {
    let state = test_state().await;
    seed_item(&state, "TEE-100", None).await;

    let sizes = seed_size_template(
        &state,
        "Adult Tees",
        &[("S", "Small", 0), ("M", "Medium", 0), ("L", "Large", 100)],
    )
    .await;
    let colors = seed_color_template(&state, "Basics", &[("Red", "#f00"), ("Blue", "#00f")]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-100")).await;
    assign_template(&state, OptionType::ColorTemplate, colors.template.id, sku_target("TEE-100")).await;

    let report = state.matrix.ensure_matrix("TEE-100").await.unwrap();
    assert_eq!(report.colors_created, 2);
    assert_eq!(report.variants_created, 6);
    assert_eq!(report.variants.len(), 6);
    assert!(report.variants.iter().all(|v| v.color_id.is_some()));
    assert!(report.variants.iter().all(|v| v.gender.as_deref() == Some("Unisex")));

    let groups = state.matrix.grouped_variants("TEE-100").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].gender, "Unisex");
    assert_eq!(groups[0].colors.len(), 2);
    for color in &groups[0].colors {
        assert_eq!(color.variants.len(), 3);
    }
}

#[tokio::test]
async fn test_ensure_matrix_is_idempotent() {
    let state = test_state().await;
    seed_item(&state, "TEE-101", None).await;
    let sizes = seed_size_template(&state, "Tee Sizes", &[("S", "Small", 0), ("M", "Medium", 0)]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-101")).await;

    let first = state.matrix.ensure_matrix("TEE-101").await.unwrap();
    assert_eq!(first.variants_created, 2);

    let second = state.matrix.ensure_matrix("TEE-101").await.unwrap();
    assert_eq!(second.variants_created, 0);
    assert_eq!(second.colors_created, 0);
    assert_eq!(second.variants.len(), 2);
}

#[tokio::test]
async fn test_ensure_matrix_repair_is_additive_only() {
    let state = test_state().await;
    seed_item(&state, "TEE-102", None).await;
    let sizes = seed_size_template(&state, "Growing", &[("S", "Small", 0), ("M", "Medium", 0)]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-102")).await;
    state.matrix.ensure_matrix("TEE-102").await.unwrap();

    // Hand-set stock on an existing row, then widen the template
    let existing = variant::find_active_by_sku(&state.db.pool, "TEE-102").await.unwrap();
    let small = existing.iter().find(|v| v.size_code == "S").unwrap();
    variant::update(
        &state.db.pool,
        small.id,
        ItemVariantUpdate {
            size_name: None,
            stock_level: Some(7),
            price_adjustment: None,
            is_active: None,
            display_order: None,
        },
    )
    .await
    .unwrap();

    state
        .templates
        .update_size_template(
            sizes.template.id,
            SizeTemplateUpdate {
                template_name: None,
                category: None,
                description: None,
                is_active: None,
                items: Some(vec![
                    SizeTemplateItemInput {
                        size_name: "Small".into(),
                        size_code: "S".into(),
                        price_adjustment: Some(0),
                        display_order: Some(0),
                    },
                    SizeTemplateItemInput {
                        size_name: "Medium".into(),
                        size_code: "M".into(),
                        price_adjustment: Some(0),
                        display_order: Some(1),
                    },
                    SizeTemplateItemInput {
                        size_name: "X-Large".into(),
                        size_code: "XL".into(),
                        price_adjustment: Some(150),
                        display_order: Some(2),
                    },
                ]),
            },
        )
        .await
        .unwrap();

    let report = state.matrix.ensure_matrix("TEE-102").await.unwrap();
    assert_eq!(report.variants_created, 1);
    assert_eq!(report.variants.len(), 3);
    let small_after = report.variants.iter().find(|v| v.size_code == "S").unwrap();
    assert_eq!(small_after.stock_level, 7);
}

#[tokio::test]
async fn test_concurrent_ensure_creates_each_slot_once() {
    let state = test_state().await;
    seed_item(&state, "TEE-103", None).await;
    let sizes = seed_size_template(
        &state,
        "Race Sizes",
        &[("S", "Small", 0), ("M", "Medium", 0), ("L", "Large", 0)],
    )
    .await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-103")).await;

    let (a, b) = tokio::join!(
        state.matrix.ensure_matrix("TEE-103"),
        state.matrix.ensure_matrix("TEE-103"),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.variants_created + b.variants_created, 3);

    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-103").await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_disabled_color_yields_general_rows() {
    let state = test_state().await;
    seed_item(&state, "MUG-100", None).await;
    let sizes = seed_size_template(&state, "Mug Sizes", &[("S", "Small", 0), ("L", "Large", 50)]).await;
    let colors = seed_color_template(&state, "Mug Colors", &[("White", "#fff")]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("MUG-100")).await;
    assign_template(&state, OptionType::ColorTemplate, colors.template.id, sku_target("MUG-100")).await;

    state
        .resolver
        .save_settings(OptionSettingsUpsert {
            scope: CascadeSource::Sku,
            item_sku: Some("MUG-100".into()),
            category_id: None,
            cascade_order: None,
            enabled_dimensions: Some(vec![Dimension::Size]),
            grouping_rules: None,
        })
        .await
        .unwrap();

    let report = state.matrix.ensure_matrix("MUG-100").await.unwrap();
    assert_eq!(report.colors_created, 0);
    assert_eq!(report.variants_created, 2);
    assert!(report.variants.iter().all(|v| v.color_id.is_none()));
    assert!(report.variants.iter().all(|v| v.gender.is_none()));
}

#[tokio::test]
async fn test_selection_resolves_price_and_stock() {
    let state = test_state().await;
    seed_item(&state, "TEE-104", None).await;
    let sizes = seed_size_template(&state, "Tee Sizes", &[("S", "Small", 0), ("L", "Large", 100)]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-104")).await;
    state.matrix.ensure_matrix("TEE-104").await.unwrap();

    let resolved = state
        .matrix
        .resolve_selection(&VariantSelection {
            item_sku: "TEE-104".into(),
            gender: None,
            color_id: None,
            size_code: "L".into(),
        })
        .await
        .unwrap();
    // Seeded base price is 1999 cents
    assert_eq!(resolved.unit_price, 2099);
    assert_eq!(resolved.stock_level, 0);
    assert!(!resolved.in_stock);

    variant::update(
        &state.db.pool,
        resolved.variant_id,
        ItemVariantUpdate {
            size_name: None,
            stock_level: Some(4),
            price_adjustment: None,
            is_active: None,
            display_order: None,
        },
    )
    .await
    .unwrap();

    let restocked = state
        .matrix
        .resolve_selection(&VariantSelection {
            item_sku: "TEE-104".into(),
            // Synonym falls back to the default gender slot
            gender: Some("male".into()),
            color_id: None,
            size_code: "L".into(),
        })
        .await
        .unwrap();
    assert!(restocked.in_stock);
    assert_eq!(restocked.stock_level, 4);
    assert_eq!(restocked.gender, "Unisex");
}

#[tokio::test]
async fn test_selection_falls_back_to_general_row() {
    let state = test_state().await;
    seed_item(&state, "SOCK-001", None).await;
    let sizes = seed_size_template(&state, "Sock Sizes", &[("OS", "One Size", 0)]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("SOCK-001")).await;
    state.matrix.ensure_matrix("SOCK-001").await.unwrap();

    // No color rows exist, so a color-qualified pick lands on the general row
    let resolved = state
        .matrix
        .resolve_selection(&VariantSelection {
            item_sku: "SOCK-001".into(),
            gender: None,
            color_id: Some(12345),
            size_code: "OS".into(),
        })
        .await
        .unwrap();
    assert_eq!(resolved.color_id, None);
    assert_eq!(resolved.size_code, "OS");
}

#[tokio::test]
async fn test_selection_with_unknown_size_is_invalid() {
    let state = test_state().await;
    seed_item(&state, "TEE-105", None).await;
    let sizes = seed_size_template(&state, "Tee Sizes", &[("S", "Small", 0)]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-105")).await;
    state.matrix.ensure_matrix("TEE-105").await.unwrap();

    let err = state
        .matrix
        .resolve_selection(&VariantSelection {
            item_sku: "TEE-105".into(),
            gender: None,
            color_id: None,
            size_code: "XXL".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SelectionInvalid);
}

#[tokio::test]
async fn test_apply_template_replaces_and_seeds_stock() {
    let state = test_state().await;
    seed_item(&state, "TEE-106", None).await;
    let old_sizes = seed_size_template(
        &state,
        "Old Run",
        &[("S", "Small", 0), ("M", "Medium", 0), ("L", "Large", 0)],
    )
    .await;
    let colors = seed_color_template(&state, "Basics", &[("Red", "#f00"), ("Blue", "#00f")]).await;
    assign_template(&state, OptionType::SizeTemplate, old_sizes.template.id, sku_target("TEE-106")).await;
    assign_template(&state, OptionType::ColorTemplate, colors.template.id, sku_target("TEE-106")).await;
    state.matrix.ensure_matrix("TEE-106").await.unwrap();

    let new_sizes = seed_size_template(&state, "New Run", &[("XL", "X-Large", 0)]).await;
    let result = state
        .templates
        .apply_size_template(
            new_sizes.template.id,
            ApplyTemplateRequest {
                item_sku: "TEE-106".into(),
                apply_mode: ApplyMode::AllColors,
                color_id: None,
                replace_existing: true,
                default_stock: 5,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.variants_deactivated, 6);
    assert_eq!(result.variants_created, 2);

    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-106").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|v| v.size_code == "XL" && v.stock_level == 5));

    let item = store_server::db::repository::item::find_by_sku(&state.db.pool, "TEE-106")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.stock_quantity, 10);
}

#[tokio::test]
async fn test_color_specific_apply_requires_a_color() {
    let state = test_state().await;
    seed_item(&state, "TEE-107", None).await;
    let sizes = seed_size_template(&state, "Old Run", &[("S", "Small", 0), ("M", "Medium", 0)]).await;
    let colors = seed_color_template(&state, "Basics", &[("Red", "#f00")]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-107")).await;
    assign_template(&state, OptionType::ColorTemplate, colors.template.id, sku_target("TEE-107")).await;
    state.matrix.ensure_matrix("TEE-107").await.unwrap();

    let new_sizes = seed_size_template(&state, "New Run", &[("XL", "X-Large", 0)]).await;
    let err = state
        .templates
        .apply_size_template(
            new_sizes.template.id,
            ApplyTemplateRequest {
                item_sku: "TEE-107".into(),
                apply_mode: ApplyMode::ColorSpecific,
                color_id: None,
                replace_existing: true,
                default_stock: 0,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    // Rejected before anything was deactivated
    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-107").await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_color_specific_apply_touches_one_color_only() {
    let state = test_state().await;
    seed_item(&state, "TEE-108", None).await;
    let sizes = seed_size_template(&state, "Old Run", &[("S", "Small", 0), ("M", "Medium", 0)]).await;
    let colors = seed_color_template(&state, "Basics", &[("Red", "#f00"), ("Blue", "#00f")]).await;
    assign_template(&state, OptionType::SizeTemplate, sizes.template.id, sku_target("TEE-108")).await;
    assign_template(&state, OptionType::ColorTemplate, colors.template.id, sku_target("TEE-108")).await;
    state.matrix.ensure_matrix("TEE-108").await.unwrap();

    let red = variant::find_colors(&state.db.pool, "TEE-108")
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.color_name == "Red")
        .unwrap();

    let new_sizes = seed_size_template(&state, "New Run", &[("XL", "X-Large", 0)]).await;
    let result = state
        .templates
        .apply_size_template(
            new_sizes.template.id,
            ApplyTemplateRequest {
                item_sku: "TEE-108".into(),
                apply_mode: ApplyMode::ColorSpecific,
                color_id: Some(red.id),
                replace_existing: true,
                default_stock: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.variants_deactivated, 2);
    assert_eq!(result.variants_created, 1);

    let rows = variant::find_active_by_sku(&state.db.pool, "TEE-108").await.unwrap();
    let red_rows: Vec<_> = rows.iter().filter(|v| v.color_id == Some(red.id)).collect();
    assert_eq!(red_rows.len(), 1);
    assert!(red_rows[0].size_code == "XL" && red_rows[0].stock_level == 3);
    // The other color's rows were left alone
    assert_eq!(rows.len() - red_rows.len(), 2);
}
