//! Stock Synchronizer
//!
//! Keeps `item.stock_quantity` consistent with the sum of active variant
//! rows, and splits an edited aggregate back across variants with pure
//! integer arithmetic.

use crate::db::repository::{item, variant};
use crate::options::cascade::normalize_gender;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AggregateBucket, ItemVariant, StockAggregates, StockSummary, StockSyncResult, DEFAULT_GENDER,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Optional per-dimension filters for [`StockSynchronizer::aggregates`]
#[derive(Debug, Clone, Default)]
pub struct AggregateFilter {
    pub gender: Option<String>,
    pub size_code: Option<String>,
    pub color_id: Option<i64>,
}

impl AggregateFilter {
    fn is_some(&self) -> bool {
        self.gender.is_some() || self.size_code.is_some() || self.color_id.is_some()
    }

    fn matches(&self, v: &ItemVariant) -> bool {
        if let Some(gender) = &self.gender {
            let wanted = normalize_gender(gender);
            let actual = v
                .gender
                .as_deref()
                .map(normalize_gender)
                .unwrap_or_else(|| DEFAULT_GENDER.to_string());
            if actual != wanted {
                return false;
            }
        }
        if let Some(size_code) = &self.size_code {
            if &v.size_code != size_code {
                return false;
            }
        }
        if let Some(color_id) = self.color_id {
            if v.color_id != Some(color_id) {
                return false;
            }
        }
        true
    }
}

/// Spread `target_total - sum(current)` across the entries as evenly as
/// possible, clamping at zero on decrease.
///
/// When decreasing, only entries above zero absorb the change; an entry that
/// hits zero drops out and the remainder rolls into the next round. If every
/// entry hits zero before the delta is exhausted the remainder is dropped —
/// the caller sees the shortfall as a soft success, not an error.
pub fn distribute_even_non_negative(current: &[i64], target_total: i64) -> Vec<i64> {
    let target_total = target_total.max(0);
    let mut levels: Vec<i64> = current.iter().map(|v| (*v).max(0)).collect();
    if levels.is_empty() {
        return levels;
    }

    let sum: i64 = levels.iter().sum();
    let mut delta = target_total - sum;

    if delta > 0 {
        let n = levels.len() as i64;
        let step = delta / n;
        let mut remainder = delta - step * n;
        for level in levels.iter_mut() {
            *level += step;
            if remainder > 0 {
                *level += 1;
                remainder -= 1;
            }
        }
        return levels;
    }

    while delta < 0 {
        let eligible: Vec<usize> = (0..levels.len()).filter(|&i| levels[i] > 0).collect();
        if eligible.is_empty() {
            break;
        }
        let n = eligible.len() as i64;
        let step = (-delta) / n;
        if step == 0 {
            // Fewer units left to remove than eligible entries
            for &i in eligible.iter().take((-delta) as usize) {
                levels[i] -= 1;
                delta += 1;
            }
        } else {
            for &i in &eligible {
                let dec = step.min(levels[i]);
                levels[i] -= dec;
                delta += dec;
            }
        }
    }
    levels
}

// Buckets keep first-seen order, matching the variant sort
fn bump(buckets: &mut Vec<AggregateBucket>, key: String, stock: i64) {
    match buckets.iter_mut().find(|b| b.key == key) {
        Some(b) => {
            b.stock += stock;
            b.variant_count += 1;
        }
        None => buckets.push(AggregateBucket {
            key,
            stock,
            variant_count: 1,
        }),
    }
}

#[derive(Clone)]
pub struct StockSynchronizer {
    pool: SqlitePool,
}

impl StockSynchronizer {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Roll active variant stock up by gender, size, and color
    ///
    /// When the item has colors and a filter is applied, "general"
    /// (color-less) rows are left out of the filtered sums so color-level
    /// numbers stay additive.
    pub async fn aggregates(
        &self,
        sku: &str,
        filter: &AggregateFilter,
    ) -> AppResult<StockAggregates> {
        if item::find_by_sku(&self.pool, sku).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ItemNotFound,
                format!("Item {sku} not found"),
            ));
        }
        let colors = variant::find_colors(&self.pool, sku).await?;
        let color_names: HashMap<i64, String> =
            colors.iter().map(|c| (c.id, c.color_name.clone())).collect();
        let drop_general = filter.is_some() && !colors.is_empty();

        let variants: Vec<ItemVariant> = variant::find_active_by_sku(&self.pool, sku)
            .await?
            .into_iter()
            .filter(|v| !(drop_general && v.color_id.is_none()))
            .filter(|v| filter.matches(v))
            .collect();

        let mut by_gender: Vec<AggregateBucket> = Vec::new();
        let mut by_size: Vec<AggregateBucket> = Vec::new();
        let mut by_color: Vec<AggregateBucket> = Vec::new();
        let mut total = 0;
        for v in &variants {
            total += v.stock_level;
            let gender = v
                .gender
                .as_deref()
                .map(normalize_gender)
                .unwrap_or_else(|| DEFAULT_GENDER.to_string());
            bump(&mut by_gender, gender, v.stock_level);
            bump(&mut by_size, v.size_code.clone(), v.stock_level);
            let color = match v.color_id.and_then(|id| color_names.get(&id)) {
                Some(name) => name.clone(),
                None => "general".to_string(),
            };
            bump(&mut by_color, color, v.stock_level);
        }

        Ok(StockAggregates {
            item_sku: sku.to_string(),
            total,
            by_gender,
            by_size,
            by_color,
        })
    }

    /// Report aggregate and variant stock side by side without writing
    pub async fn summary(&self, sku: &str) -> AppResult<StockSummary> {
        let item_row = item::find_by_sku(&self.pool, sku).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::ItemNotFound, format!("Item {sku} not found"))
        })?;
        let variants = variant::find_active_by_sku(&self.pool, sku).await?;
        let variant_total = variant::sum_active_stock(&self.pool, sku).await?;
        Ok(StockSummary {
            item_sku: sku.to_string(),
            stock_quantity: item_row.stock_quantity,
            variant_total,
            variant_count: variants.len(),
            divergent: !variants.is_empty() && item_row.stock_quantity != variant_total,
        })
    }

    /// Set the item aggregate to the exact sum of its active variant rows
    pub async fn sync_from_variants(&self, sku: &str) -> AppResult<StockSyncResult> {
        let variants = variant::find_active_by_sku(&self.pool, sku).await?;
        let total = variant::sum_active_stock(&self.pool, sku).await?;
        item::update_stock_quantity(&self.pool, sku, total).await?;
        Ok(StockSyncResult {
            item_sku: sku.to_string(),
            stock_quantity: total,
            variant_count: variants.len(),
            shortfall: 0,
        })
    }

    /// Split an edited aggregate across the active variants, then write the
    /// achieved sum back to the item
    pub async fn distribute_evenly(&self, sku: &str, target_total: i64) -> AppResult<StockSyncResult> {
        if target_total < 0 {
            return Err(AppError::new(ErrorCode::NegativeStock)
                .with_detail("target_total", target_total));
        }

        let variants = variant::find_active_by_sku(&self.pool, sku).await?;
        if variants.is_empty() {
            // No granular rows; the aggregate is the only stock record
            item::update_stock_quantity(&self.pool, sku, target_total).await?;
            return Ok(StockSyncResult {
                item_sku: sku.to_string(),
                stock_quantity: target_total,
                variant_count: 0,
                shortfall: 0,
            });
        }

        let current: Vec<i64> = variants.iter().map(|v| v.stock_level).collect();
        let next = distribute_even_non_negative(&current, target_total);
        let achieved: i64 = next.iter().sum();
        let shortfall = target_total - achieved;
        if shortfall != 0 {
            tracing::warn!(sku, target_total, achieved, "Stock redistribution under-shot");
        }

        let writes: Vec<(i64, i64)> = variants
            .iter()
            .zip(next.iter())
            .filter(|(v, level)| v.stock_level != **level)
            .map(|(v, level)| (v.id, *level))
            .collect();
        variant::set_stock_levels(&self.pool, &writes).await?;
        item::update_stock_quantity(&self.pool, sku, achieved).await?;

        Ok(StockSyncResult {
            item_sku: sku.to_string(),
            stock_quantity: achieved,
            variant_count: variants.len(),
            shortfall,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_decrease() {
        assert_eq!(distribute_even_non_negative(&[5, 5, 5], 9), vec![3, 3, 3]);
    }

    #[test]
    fn test_even_increase_with_remainder() {
        let out = distribute_even_non_negative(&[0, 0, 0], 10);
        assert_eq!(out.iter().sum::<i64>(), 10);
        assert_eq!(out, vec![4, 3, 3]);
    }

    #[test]
    fn test_decrease_clamps_at_zero_and_rolls_over() {
        // 1 can only give 1; the rest comes from the larger entries
        let out = distribute_even_non_negative(&[1, 10, 10], 3);
        assert_eq!(out.iter().sum::<i64>(), 3);
        assert!(out.iter().all(|&v| v >= 0));
    }

    #[test]
    fn test_decrease_to_zero() {
        assert_eq!(distribute_even_non_negative(&[4, 2, 9], 0), vec![0, 0, 0]);
    }

    #[test]
    fn test_target_conserved_for_any_direction() {
        for (current, target) in [
            (vec![3, 3, 3], 15),
            (vec![7, 0, 2], 5),
            (vec![0, 0], 1),
            (vec![13], 13),
        ] {
            let out = distribute_even_non_negative(&current, target);
            assert_eq!(out.len(), current.len());
            assert_eq!(out.iter().sum::<i64>(), target);
            assert!(out.iter().all(|&v| v >= 0));
        }
    }

    #[test]
    fn test_negative_target_clamped() {
        let out = distribute_even_non_negative(&[2, 2], -5);
        assert_eq!(out, vec![0, 0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(distribute_even_non_negative(&[], 10).is_empty());
    }
}
