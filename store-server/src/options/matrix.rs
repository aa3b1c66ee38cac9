//! Variant Matrix Manager
//!
//! Expands the resolved option lists into concrete variant rows: one per
//! enabled (gender × color × size) combination, plus color-independent
//! "general" rows when the color dimension is off. Repair is additive only;
//! existing rows and their stock are never touched.

use crate::db::repository::{item, variant};
use crate::options::cascade::{normalize_gender, CascadeResolver};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Dimension, EffectiveOptions, ItemColor, ItemVariant, MatrixEnsureReport, ResolvedSelection,
    VariantColorGroup, VariantGenderGroup, VariantSelection, DEFAULT_GENDER,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Which colors an ensure pass may add rows for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScope {
    All,
    /// One color's slots only
    Only(i64),
}

#[derive(Clone)]
pub struct MatrixManager {
    pool: SqlitePool,
    resolver: CascadeResolver,
}

impl MatrixManager {
    pub fn new(pool: SqlitePool, resolver: CascadeResolver) -> Self {
        Self { pool, resolver }
    }

    /// Idempotent matrix repair: insert any missing slot, never delete or
    /// zero stock. Safe to race; the duplicate insert is ignored.
    pub async fn ensure_matrix(&self, sku: &str) -> AppResult<MatrixEnsureReport> {
        self.ensure_with(sku, 0, ColorScope::All).await
    }

    /// Ensure pass with an initial stock for new rows and a color restriction
    /// (used when applying a template to an item)
    pub async fn ensure_with(
        &self,
        sku: &str,
        default_stock: i64,
        scope: ColorScope,
    ) -> AppResult<MatrixEnsureReport> {
        let item_row = item::find_by_sku(&self.pool, sku).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::ItemNotFound, format!("Item {sku} not found"))
        })?;

        let options = self.resolver.resolve(sku).await?;
        let settings = self
            .resolver
            .effective_settings(sku, item_row.category_id)
            .await?;

        if settings.enabled_dimensions.is_empty() {
            // Size/color-less item: nothing to generate
            return Ok(MatrixEnsureReport {
                item_sku: sku.to_string(),
                colors_created: 0,
                variants_created: 0,
                variants: variant::find_active_by_sku(&self.pool, sku).await?,
            });
        }

        let mut colors_created = 0;
        let color_enabled = settings.is_enabled(Dimension::Color);
        if color_enabled {
            let existing: Vec<String> = variant::find_colors(&self.pool, sku)
                .await?
                .into_iter()
                .map(|c| c.color_name)
                .collect();
            let base = existing.len() as i32;
            for (idx, color) in options.colors.iter().enumerate() {
                if !existing.contains(&color.name) {
                    variant::ensure_color(
                        &self.pool,
                        sku,
                        &color.name,
                        &color.code,
                        base + idx as i32,
                    )
                    .await?;
                    colors_created += 1;
                }
            }
        }

        // Color slots for the cross product: per-color when the dimension is
        // on and resolved non-empty, otherwise a single "general" slot
        let color_slots: Vec<Option<i64>> = if color_enabled && !options.colors.is_empty() {
            variant::find_colors(&self.pool, sku)
                .await?
                .into_iter()
                .filter(|c| options.colors.iter().any(|o| o.name == c.color_name))
                .map(|c| Some(c.id))
                .collect()
        } else {
            vec![None]
        };

        let genders: Vec<Option<String>> = if settings.is_enabled(Dimension::Gender) {
            options
                .genders
                .iter()
                .map(|g| Some(normalize_gender(g)))
                .collect()
        } else {
            vec![None]
        };

        let sizes = if settings.is_enabled(Dimension::Size) {
            options.sizes.clone()
        } else {
            Vec::new()
        };

        let mut variants_created = 0;
        for gender in &genders {
            for color_id in &color_slots {
                if let ColorScope::Only(only) = scope {
                    if *color_id != Some(only) {
                        continue;
                    }
                }
                let mut next_order = variant::max_display_order(
                    &self.pool,
                    sku,
                    gender.as_deref(),
                    *color_id,
                )
                .await?
                    + 1;
                for size in &sizes {
                    let inserted = variant::insert_slot(
                        &self.pool,
                        sku,
                        gender.as_deref(),
                        *color_id,
                        &size.name,
                        &size.code,
                        default_stock,
                        size.price_adjustment,
                        next_order,
                    )
                    .await?;
                    if inserted {
                        variants_created += 1;
                        next_order += 1;
                    }
                }
            }
        }

        Ok(MatrixEnsureReport {
            item_sku: sku.to_string(),
            colors_created,
            variants_created,
            variants: variant::find_active_by_sku(&self.pool, sku).await?,
        })
    }

    /// Active variants grouped gender → color for table rendering
    pub async fn grouped_variants(&self, sku: &str) -> AppResult<Vec<VariantGenderGroup>> {
        let variants = variant::find_active_by_sku(&self.pool, sku).await?;
        let colors = variant::find_colors(&self.pool, sku).await?;
        Ok(group_variants(variants, &colors))
    }

    /// Validate a storefront selection against live variants
    ///
    /// A selection with an unknown gender falls back to the default gender
    /// slot, and a missing color-specific slot falls back to the "general"
    /// size row, before being rejected.
    pub async fn resolve_selection(
        &self,
        selection: &VariantSelection,
    ) -> AppResult<ResolvedSelection> {
        let item_row = item::find_by_sku(&self.pool, &selection.item_sku)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ItemNotFound,
                    format!("Item {} not found", selection.item_sku),
                )
            })?;

        let gender = selection.gender.as_deref().map(normalize_gender);
        let mut found = variant::find_by_slot(
            &self.pool,
            &selection.item_sku,
            gender.as_deref(),
            selection.color_id,
            &selection.size_code,
        )
        .await?;
        if found.is_none() && gender.as_deref() != Some(DEFAULT_GENDER) {
            found = variant::find_by_slot(
                &self.pool,
                &selection.item_sku,
                Some(DEFAULT_GENDER),
                selection.color_id,
                &selection.size_code,
            )
            .await?;
        }
        // Color-specific slot missing: fall back to the "general" size row
        if found.is_none() && selection.color_id.is_some() {
            found = variant::find_by_slot(
                &self.pool,
                &selection.item_sku,
                gender.as_deref(),
                None,
                &selection.size_code,
            )
            .await?;
        }

        let v = found.ok_or_else(|| {
            AppError::new(ErrorCode::SelectionInvalid)
                .with_detail("item_sku", selection.item_sku.clone())
                .with_detail("size_code", selection.size_code.clone())
        })?;

        Ok(ResolvedSelection {
            variant_id: v.id,
            item_sku: v.item_sku,
            gender: v.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            color_id: v.color_id,
            size_code: v.size_code,
            stock_level: v.stock_level,
            unit_price: item_row.base_price + v.price_adjustment,
            in_stock: v.stock_level > 0,
        })
    }

    /// Distinct genders currently on the item, falling back to the resolved list
    pub async fn list_genders(&self, sku: &str) -> AppResult<Vec<String>> {
        let existing = variant::distinct_genders(&self.pool, sku).await?;
        if !existing.is_empty() {
            let mut genders = Vec::new();
            for raw in existing {
                let g = normalize_gender(&raw);
                if !genders.contains(&g) {
                    genders.push(g);
                }
            }
            return Ok(genders);
        }
        let options: EffectiveOptions = self.resolver.resolve(sku).await?;
        Ok(options.genders)
    }
}

fn group_variants(variants: Vec<ItemVariant>, colors: &[ItemColor]) -> Vec<VariantGenderGroup> {
    let color_index: HashMap<i64, &ItemColor> = colors.iter().map(|c| (c.id, c)).collect();

    let mut groups: Vec<VariantGenderGroup> = Vec::new();
    for v in variants {
        let gender = v
            .gender
            .clone()
            .unwrap_or_else(|| DEFAULT_GENDER.to_string());
        let (color_name, color_code) = match v.color_id.and_then(|id| color_index.get(&id)) {
            Some(c) => (c.color_name.clone(), Some(c.color_code.clone())),
            None => ("general".to_string(), None),
        };

        let idx = match groups.iter().position(|g| g.gender == gender) {
            Some(idx) => idx,
            None => {
                groups.push(VariantGenderGroup {
                    gender: gender.clone(),
                    colors: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let gender_group = &mut groups[idx];
        match gender_group
            .colors
            .iter_mut()
            .find(|c| c.color_id == v.color_id)
        {
            Some(c) => c.variants.push(v),
            None => gender_group.colors.push(VariantColorGroup {
                color_id: v.color_id,
                color_name,
                color_code,
                variants: vec![v],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_variant(id: i64, gender: Option<&str>, color_id: Option<i64>, code: &str) -> ItemVariant {
        ItemVariant {
            id,
            item_sku: "SKU-1".into(),
            gender: gender.map(String::from),
            color_id,
            size_name: code.into(),
            size_code: code.into(),
            stock_level: 0,
            price_adjustment: 0,
            is_active: true,
            display_order: 0,
        }
    }

    #[test]
    fn test_group_variants_gender_then_color() {
        let colors = vec![ItemColor {
            id: 10,
            item_sku: "SKU-1".into(),
            color_name: "Red".into(),
            color_code: "#f00".into(),
            is_active: true,
            display_order: 0,
        }];
        let variants = vec![
            make_variant(1, Some("Men"), Some(10), "S"),
            make_variant(2, Some("Men"), Some(10), "M"),
            make_variant(3, Some("Men"), None, "OS"),
            make_variant(4, None, Some(10), "S"),
        ];

        let groups = group_variants(variants, &colors);
        assert_eq!(groups.len(), 2);

        let men = &groups[0];
        assert_eq!(men.gender, "Men");
        assert_eq!(men.colors.len(), 2);
        let red = men.colors.iter().find(|c| c.color_id == Some(10)).unwrap();
        assert_eq!(red.color_name, "Red");
        assert_eq!(red.variants.len(), 2);
        let general = men.colors.iter().find(|c| c.color_id.is_none()).unwrap();
        assert_eq!(general.color_name, "general");

        assert_eq!(groups[1].gender, "Unisex");
    }
}
