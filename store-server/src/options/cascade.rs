//! Cascade Resolver
//!
//! Computes the effective gender/size/color option lists for a SKU by walking
//! SKU → category → system tiers per dimension. Each dimension is resolved
//! independently: a SKU may override color through its own template while
//! inheriting size from its category.

use crate::db::repository::{cascade_settings, item, option_link, size_template, variant};
use crate::db::repository::color_template;
use parking_lot::RwLock;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AssignmentTarget, CascadeSource, ColorOption, Dimension, EffectiveOptions, OptionSettings,
    OptionSettingsUpsert, OptionType, SizeOption, DEFAULT_GENDER,
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Canonicalize a gender label; synonyms collapse onto one spelling
pub fn normalize_gender(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => DEFAULT_GENDER.to_string(),
        "men" | "male" => "Men".to_string(),
        "women" | "female" => "Women".to_string(),
        "unisex" => DEFAULT_GENDER.to_string(),
        _ => raw.trim().to_string(),
    }
}

struct CachedOptions {
    resolved_at: Instant,
    options: EffectiveOptions,
}

/// Per-SKU resolver with a short-TTL read-through cache
///
/// Cloning shares the cache; every write path that touches a SKU's
/// assignments, settings, or templates must call [`invalidate`] /
/// [`invalidate_all`].
///
/// [`invalidate`]: CascadeResolver::invalidate
/// [`invalidate_all`]: CascadeResolver::invalidate_all
#[derive(Clone)]
pub struct CascadeResolver {
    pool: SqlitePool,
    ttl: Duration,
    cache: Arc<RwLock<HashMap<String, CachedOptions>>>,
}

impl CascadeResolver {
    pub fn new(pool: SqlitePool, ttl_ms: u64) -> Self {
        Self {
            pool,
            ttl: Duration::from_millis(ttl_ms),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve the effective options for one SKU
    pub async fn resolve(&self, sku: &str) -> AppResult<EffectiveOptions> {
        if let Some(cached) = self.cache.read().get(sku) {
            if cached.resolved_at.elapsed() < self.ttl {
                return Ok(cached.options.clone());
            }
        }

        let options = self.resolve_uncached(sku).await?;
        self.cache.write().insert(
            sku.to_string(),
            CachedOptions {
                resolved_at: Instant::now(),
                options: options.clone(),
            },
        );
        Ok(options)
    }

    /// Drop the cached resolution for one SKU
    pub fn invalidate(&self, sku: &str) {
        self.cache.write().remove(sku);
    }

    /// Drop every cached resolution (template/category-wide writes)
    pub fn invalidate_all(&self) {
        self.cache.write().clear();
    }

    async fn resolve_uncached(&self, sku: &str) -> AppResult<EffectiveOptions> {
        let item = item::find_by_sku(&self.pool, sku)
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ItemNotFound, format!("Item {sku} not found"))
            })?;

        let settings = self.effective_settings(sku, item.category_id).await?;
        let order = clean_cascade_order(&settings.cascade_order);

        let mut options = EffectiveOptions::empty();
        for dim in order {
            // A disabled dimension stays empty even when a template is linked
            if !settings.is_enabled(dim) {
                continue;
            }
            match dim {
                Dimension::Gender => {
                    let (genders, source) = self.resolve_genders(sku).await?;
                    if !genders.is_empty() {
                        options.source = source;
                    }
                    options.genders = genders;
                }
                Dimension::Size => {
                    let (sizes, source) = self.resolve_sizes(sku, item.category_id).await?;
                    if !sizes.is_empty() {
                        options.source = source;
                    }
                    options.sizes = sizes;
                }
                Dimension::Color => {
                    let (colors, source) = self.resolve_colors(sku, item.category_id).await?;
                    if !colors.is_empty() {
                        options.source = source;
                    }
                    options.colors = colors;
                }
            }
        }
        Ok(options)
    }

    /// Settings for a SKU: SKU scope, then its category, then the system row,
    /// then built-in defaults
    pub async fn effective_settings(
        &self,
        sku: &str,
        category_id: Option<i64>,
    ) -> AppResult<OptionSettings> {
        if let Some(s) =
            cascade_settings::find_for_scope(&self.pool, CascadeSource::Sku, Some(sku), None)
                .await?
        {
            return Ok(s);
        }
        if let Some(category_id) = category_id {
            if let Some(s) = cascade_settings::find_for_scope(
                &self.pool,
                CascadeSource::Category,
                None,
                Some(category_id),
            )
            .await?
            {
                return Ok(s);
            }
        }
        if let Some(s) =
            cascade_settings::find_for_scope(&self.pool, CascadeSource::System, None, None).await?
        {
            return Ok(s);
        }
        Ok(default_settings())
    }

    /// Persist settings and drop affected cache entries
    pub async fn save_settings(&self, data: OptionSettingsUpsert) -> AppResult<OptionSettings> {
        let saved = cascade_settings::upsert(&self.pool, data).await?;
        match saved.scope {
            CascadeSource::Sku => {
                if let Some(sku) = &saved.item_sku {
                    self.invalidate(sku);
                }
            }
            // Category/system rows can affect any SKU
            _ => self.invalidate_all(),
        }
        Ok(saved)
    }

    /// Soft-delete a settings row; the scope falls back to the next tier
    pub async fn delete_settings(
        &self,
        scope: CascadeSource,
        item_sku: Option<&str>,
        category_id: Option<i64>,
    ) -> AppResult<bool> {
        let deleted =
            cascade_settings::soft_delete_for_scope(&self.pool, scope, item_sku, category_id)
                .await?;
        if deleted {
            match (scope, item_sku) {
                (CascadeSource::Sku, Some(sku)) => self.invalidate(sku),
                _ => self.invalidate_all(),
            }
        }
        Ok(deleted)
    }

    // Gender has no templates: the SKU tier is the genders already present on
    // active variants, the system tier is the built-in default.
    async fn resolve_genders(&self, sku: &str) -> AppResult<(Vec<String>, CascadeSource)> {
        let mut genders: Vec<String> = Vec::new();
        for raw in variant::distinct_genders(&self.pool, sku).await? {
            let g = normalize_gender(&raw);
            if !genders.contains(&g) {
                genders.push(g);
            }
        }
        if !genders.is_empty() {
            return Ok((genders, CascadeSource::Sku));
        }
        Ok((vec![DEFAULT_GENDER.to_string()], CascadeSource::System))
    }

    async fn resolve_sizes(
        &self,
        sku: &str,
        category_id: Option<i64>,
    ) -> AppResult<(Vec<SizeOption>, CascadeSource)> {
        for (target, source) in tier_targets(sku, category_id) {
            let Some(link) =
                option_link::find_active(&self.pool, OptionType::SizeTemplate, &target).await?
            else {
                continue;
            };
            let sizes = self.expand_size_template(&link.option_label, link.option_id).await?;
            if !sizes.is_empty() {
                return Ok((sizes, source));
            }
        }
        Ok((Vec::new(), CascadeSource::System))
    }

    async fn resolve_colors(
        &self,
        sku: &str,
        category_id: Option<i64>,
    ) -> AppResult<(Vec<ColorOption>, CascadeSource)> {
        for (target, source) in tier_targets(sku, category_id) {
            let Some(link) =
                option_link::find_active(&self.pool, OptionType::ColorTemplate, &target).await?
            else {
                continue;
            };
            let colors = self.expand_color_template(&link.option_label, link.option_id).await?;
            if !colors.is_empty() {
                return Ok((colors, source));
            }
        }
        Ok((Vec::new(), CascadeSource::System))
    }

    async fn expand_size_template(
        &self,
        label: &str,
        template_id: Option<i64>,
    ) -> AppResult<Vec<SizeOption>> {
        let Some(template_id) = template_id else {
            tracing::warn!(label, "Size link has no template id; resolving to empty");
            return Ok(Vec::new());
        };
        match size_template::find_by_id(&self.pool, template_id).await? {
            Some(t) if t.is_active => {
                let items = size_template::find_items(&self.pool, template_id).await?;
                let mut seen = Vec::new();
                let mut sizes = Vec::new();
                for item in items {
                    if seen.contains(&item.size_code) {
                        continue;
                    }
                    seen.push(item.size_code.clone());
                    sizes.push(SizeOption {
                        code: item.size_code,
                        name: item.size_name,
                        price_adjustment: item.price_adjustment,
                    });
                }
                Ok(sizes)
            }
            // Degrade to empty, keep the data problem visible
            _ => {
                tracing::warn!(template_id, label, "Referenced size template missing or inactive");
                Ok(Vec::new())
            }
        }
    }

    async fn expand_color_template(
        &self,
        label: &str,
        template_id: Option<i64>,
    ) -> AppResult<Vec<ColorOption>> {
        let Some(template_id) = template_id else {
            tracing::warn!(label, "Color link has no template id; resolving to empty");
            return Ok(Vec::new());
        };
        match color_template::find_by_id(&self.pool, template_id).await? {
            Some(t) if t.is_active => {
                let items = color_template::find_items(&self.pool, template_id).await?;
                let mut seen = Vec::new();
                let mut colors = Vec::new();
                for item in items {
                    if seen.contains(&item.color_name) {
                        continue;
                    }
                    seen.push(item.color_name.clone());
                    colors.push(ColorOption {
                        name: item.color_name,
                        code: item.color_code,
                    });
                }
                Ok(colors)
            }
            _ => {
                tracing::warn!(template_id, label, "Referenced color template missing or inactive");
                Ok(Vec::new())
            }
        }
    }
}

/// SKU then category targets, paired with their provenance tier
fn tier_targets(
    sku: &str,
    category_id: Option<i64>,
) -> Vec<(AssignmentTarget, CascadeSource)> {
    let mut targets = vec![(
        AssignmentTarget::Sku {
            item_sku: sku.to_string(),
        },
        CascadeSource::Sku,
    )];
    if let Some(category_id) = category_id {
        targets.push((
            AssignmentTarget::Category { category_id },
            CascadeSource::Category,
        ));
    }
    targets
}

/// Drop duplicates preserving first occurrence; empty falls back to the default order
fn clean_cascade_order(order: &[Dimension]) -> Vec<Dimension> {
    let mut cleaned: Vec<Dimension> = Vec::new();
    for dim in order {
        if !cleaned.contains(dim) {
            cleaned.push(*dim);
        }
    }
    if cleaned.is_empty() {
        cleaned.extend(Dimension::DEFAULT_ORDER);
    }
    cleaned
}

fn default_settings() -> OptionSettings {
    OptionSettings {
        id: 0,
        scope: CascadeSource::System,
        item_sku: None,
        category_id: None,
        cascade_order: Dimension::DEFAULT_ORDER.to_vec(),
        enabled_dimensions: Dimension::DEFAULT_ORDER.to_vec(),
        grouping_rules: None,
        is_active: true,
        updated_at: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cascade_order_dedupes() {
        let order = [Dimension::Size, Dimension::Size, Dimension::Color];
        assert_eq!(
            clean_cascade_order(&order),
            vec![Dimension::Size, Dimension::Color]
        );
    }

    #[test]
    fn test_clean_cascade_order_empty_falls_back() {
        assert_eq!(
            clean_cascade_order(&[]),
            vec![Dimension::Gender, Dimension::Size, Dimension::Color]
        );
    }

    #[test]
    fn test_normalize_gender_synonyms() {
        assert_eq!(normalize_gender("male"), "Men");
        assert_eq!(normalize_gender("Men"), "Men");
        assert_eq!(normalize_gender("WOMEN"), "Women");
        assert_eq!(normalize_gender("female"), "Women");
        assert_eq!(normalize_gender(""), "Unisex");
        assert_eq!(normalize_gender("Kids"), "Kids");
    }
}
