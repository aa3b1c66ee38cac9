//! Template Store & Option Assignment Ledger
//!
//! CRUD over size/color templates, duplication, assignment upkeep, and the
//! apply-template-to-item convenience that feeds the matrix manager.

use crate::db::repository::{color_template, item, option_link, size_template, variant};
use crate::options::cascade::CascadeResolver;
use crate::options::matrix::{ColorScope, MatrixManager};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    ApplyMode, ApplyTemplateRequest, ApplyTemplateResult, AssignmentTarget, ColorTemplateCreate,
    ColorTemplateDetail, ColorTemplateUpdate, OptionAssignment, OptionAssignmentCreate,
    OptionAssignmentView, OptionType, SizeTemplateCreate, SizeTemplateDetail, SizeTemplateUpdate,
    TemplateDeleteOptions, TemplateSummary,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TemplateService {
    pool: SqlitePool,
    resolver: CascadeResolver,
    matrix: MatrixManager,
}

impl TemplateService {
    pub fn new(pool: SqlitePool, resolver: CascadeResolver, matrix: MatrixManager) -> Self {
        Self {
            pool,
            resolver,
            matrix,
        }
    }

    // ====== Size templates ======

    pub async fn list_size_templates(&self) -> AppResult<Vec<TemplateSummary>> {
        Ok(size_template::find_all(&self.pool).await?)
    }

    pub async fn get_size_template(&self, id: i64) -> AppResult<SizeTemplateDetail> {
        let template = size_template::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| template_not_found(id))?;
        let items = size_template::find_items(&self.pool, id).await?;
        Ok(SizeTemplateDetail { template, items })
    }

    pub async fn create_size_template(
        &self,
        data: SizeTemplateCreate,
    ) -> AppResult<SizeTemplateDetail> {
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::TemplateEmpty));
        }
        let template = size_template::create(&self.pool, data).await?;
        self.get_size_template(template.id).await
    }

    pub async fn update_size_template(
        &self,
        id: i64,
        data: SizeTemplateUpdate,
    ) -> AppResult<SizeTemplateDetail> {
        if matches!(&data.items, Some(items) if items.is_empty()) {
            return Err(AppError::new(ErrorCode::TemplateEmpty));
        }
        size_template::update(&self.pool, id, data).await?;
        self.resolver.invalidate_all();
        self.get_size_template(id).await
    }

    pub async fn delete_size_template(
        &self,
        id: i64,
        opts: TemplateDeleteOptions,
    ) -> AppResult<()> {
        self.delete_template(OptionType::SizeTemplate, id, opts).await
    }

    pub async fn duplicate_size_template(&self, id: i64) -> AppResult<SizeTemplateDetail> {
        let copy = size_template::duplicate(&self.pool, id).await?;
        self.get_size_template(copy.id).await
    }

    // ====== Color templates ======

    pub async fn list_color_templates(&self) -> AppResult<Vec<TemplateSummary>> {
        Ok(color_template::find_all(&self.pool).await?)
    }

    pub async fn get_color_template(&self, id: i64) -> AppResult<ColorTemplateDetail> {
        let template = color_template::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| template_not_found(id))?;
        let items = color_template::find_items(&self.pool, id).await?;
        Ok(ColorTemplateDetail { template, items })
    }

    pub async fn create_color_template(
        &self,
        data: ColorTemplateCreate,
    ) -> AppResult<ColorTemplateDetail> {
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::TemplateEmpty));
        }
        let template = color_template::create(&self.pool, data).await?;
        self.get_color_template(template.id).await
    }

    pub async fn update_color_template(
        &self,
        id: i64,
        data: ColorTemplateUpdate,
    ) -> AppResult<ColorTemplateDetail> {
        if matches!(&data.items, Some(items) if items.is_empty()) {
            return Err(AppError::new(ErrorCode::TemplateEmpty));
        }
        color_template::update(&self.pool, id, data).await?;
        self.resolver.invalidate_all();
        self.get_color_template(id).await
    }

    pub async fn delete_color_template(
        &self,
        id: i64,
        opts: TemplateDeleteOptions,
    ) -> AppResult<()> {
        self.delete_template(OptionType::ColorTemplate, id, opts).await
    }

    pub async fn duplicate_color_template(&self, id: i64) -> AppResult<ColorTemplateDetail> {
        let copy = color_template::duplicate(&self.pool, id).await?;
        self.get_color_template(copy.id).await
    }

    /// Delete a template. Blocked while live assignments reference it unless
    /// a remap target is supplied; the remap and the delete run together.
    async fn delete_template(
        &self,
        option_type: OptionType,
        id: i64,
        opts: TemplateDeleteOptions,
    ) -> AppResult<()> {
        let affected = option_link::count_active_by_template(&self.pool, option_type, id).await?;
        if affected > 0 {
            let Some(replacement) = opts.force_remap_to else {
                return Err(AppError::template_in_use(id, affected));
            };
            if replacement == id {
                return Err(AppError::invalid_request(
                    "Remap target must be a different template",
                ));
            }
            let label = match option_type {
                OptionType::SizeTemplate => size_template::find_by_id(&self.pool, replacement)
                    .await?
                    .filter(|t| t.is_active)
                    .map(|t| t.template_name),
                OptionType::ColorTemplate => color_template::find_by_id(&self.pool, replacement)
                    .await?
                    .filter(|t| t.is_active)
                    .map(|t| t.template_name),
                OptionType::Material => None,
            }
            .ok_or_else(|| template_not_found(replacement))?;

            let remapped =
                option_link::remap_template(&self.pool, option_type, id, replacement, &label)
                    .await?;
            tracing::info!(template_id = id, replacement, remapped, "Remapped template links");
        }

        let deleted = match option_type {
            OptionType::SizeTemplate => size_template::soft_delete(&self.pool, id).await?,
            OptionType::ColorTemplate => color_template::soft_delete(&self.pool, id).await?,
            OptionType::Material => false,
        };
        if !deleted {
            return Err(template_not_found(id));
        }
        self.resolver.invalidate_all();
        Ok(())
    }

    // ====== Assignments ======

    pub async fn assign(&self, data: OptionAssignmentCreate) -> AppResult<OptionAssignment> {
        self.validate_target(&data.target).await?;

        let (option_id, label) = match data.option_type {
            OptionType::SizeTemplate => {
                let id = data.option_id.ok_or_else(|| {
                    AppError::validation("Size template assignment needs option_id")
                })?;
                let t = size_template::find_by_id(&self.pool, id)
                    .await?
                    .filter(|t| t.is_active)
                    .ok_or_else(|| template_not_found(id))?;
                (Some(id), t.template_name)
            }
            OptionType::ColorTemplate => {
                let id = data.option_id.ok_or_else(|| {
                    AppError::validation("Color template assignment needs option_id")
                })?;
                let t = color_template::find_by_id(&self.pool, id)
                    .await?
                    .filter(|t| t.is_active)
                    .ok_or_else(|| template_not_found(id))?;
                (Some(id), t.template_name)
            }
            OptionType::Material => {
                let label = data
                    .option_label
                    .filter(|l| !l.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::validation("Material assignment needs option_label")
                    })?;
                (None, label)
            }
        };

        let link =
            option_link::upsert(&self.pool, data.option_type, option_id, &label, &data.target)
                .await?;
        self.invalidate_target(&data.target);
        Ok(link)
    }

    pub async fn unassign(&self, id: i64) -> AppResult<()> {
        let link = option_link::find_by_id(&self.pool, id)
            .await?
            .filter(|l| l.is_active)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AssignmentNotFound,
                    format!("Assignment {id} not found"),
                )
            })?;
        option_link::deactivate(&self.pool, id).await?;
        match link.item_sku {
            Some(sku) => self.resolver.invalidate(&sku),
            None => self.resolver.invalidate_all(),
        }
        Ok(())
    }

    /// Drop every live link of one option type for a target
    pub async fn clear_option(
        &self,
        option_type: OptionType,
        target: AssignmentTarget,
    ) -> AppResult<u64> {
        self.validate_target(&target).await?;
        let cleared = option_link::clear_for_target(&self.pool, option_type, &target).await?;
        self.invalidate_target(&target);
        Ok(cleared)
    }

    pub async fn list_for_target(
        &self,
        target: AssignmentTarget,
    ) -> AppResult<Vec<OptionAssignment>> {
        Ok(option_link::find_for_target(&self.pool, &target).await?)
    }

    /// Links visible to one SKU (own plus its category's), with category names
    pub async fn list_views_for_sku(&self, sku: &str) -> AppResult<Vec<OptionAssignmentView>> {
        let item_row = item::find_by_sku(&self.pool, sku).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::ItemNotFound, format!("Item {sku} not found"))
        })?;
        Ok(option_link::find_views_for_sku(&self.pool, sku, item_row.category_id).await?)
    }

    // ====== Apply template to item ======

    /// Assign a size template to a SKU and repair its matrix in one step
    pub async fn apply_size_template(
        &self,
        template_id: i64,
        req: ApplyTemplateRequest,
    ) -> AppResult<ApplyTemplateResult> {
        let template = size_template::find_by_id(&self.pool, template_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| template_not_found(template_id))?;
        let items = size_template::find_items(&self.pool, template_id).await?;
        if items.is_empty() {
            return Err(AppError::new(ErrorCode::TemplateEmpty));
        }
        if item::find_by_sku(&self.pool, &req.item_sku).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ItemNotFound,
                format!("Item {} not found", req.item_sku),
            ));
        }

        let scope = match req.apply_mode {
            ApplyMode::AllColors => ColorScope::All,
            ApplyMode::ColorSpecific => {
                let color_id = req.color_id.ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ValidationFailed,
                        "apply_mode color_specific requires color_id".to_string(),
                    )
                })?;
                let color = variant::find_color_by_id(&self.pool, color_id)
                    .await?
                    .filter(|c| c.is_active && c.item_sku == req.item_sku);
                if color.is_none() {
                    return Err(AppError::with_message(
                        ErrorCode::ColorNotFound,
                        format!("Color {color_id} not found on item {}", req.item_sku),
                    ));
                }
                ColorScope::Only(color_id)
            }
        };

        let target = AssignmentTarget::Sku {
            item_sku: req.item_sku.clone(),
        };
        let link = option_link::upsert(
            &self.pool,
            OptionType::SizeTemplate,
            Some(template_id),
            &template.template_name,
            &target,
        )
        .await?;
        self.resolver.invalidate(&req.item_sku);

        let mut deactivated = 0;
        if req.replace_existing {
            let affected: Vec<Option<i64>> = match scope {
                ColorScope::Only(color_id) => vec![Some(color_id)],
                ColorScope::All => {
                    let mut ids: Vec<Option<i64>> = variant::find_colors(&self.pool, &req.item_sku)
                        .await?
                        .into_iter()
                        .map(|c| Some(c.id))
                        .collect();
                    ids.push(None);
                    ids
                }
            };
            deactivated =
                variant::deactivate_for_colors(&self.pool, &req.item_sku, &affected).await? as usize;
        }

        let report = self
            .matrix
            .ensure_with(&req.item_sku, req.default_stock.max(0), scope)
            .await?;

        // Keep the aggregate in step with whatever the repair produced
        let total = variant::sum_active_stock(&self.pool, &req.item_sku).await?;
        item::update_stock_quantity(&self.pool, &req.item_sku, total).await?;

        Ok(ApplyTemplateResult {
            assignment_id: link.id,
            variants_created: report.variants_created,
            variants_deactivated: deactivated,
        })
    }

    async fn validate_target(&self, target: &AssignmentTarget) -> AppResult<()> {
        match target {
            AssignmentTarget::Sku { item_sku } => {
                if item::find_by_sku(&self.pool, item_sku).await?.is_none() {
                    return Err(AppError::with_message(
                        ErrorCode::AssignmentTargetInvalid,
                        format!("Item {item_sku} not found"),
                    ));
                }
            }
            AssignmentTarget::Category { category_id } => {
                let found = item::find_category_by_id(&self.pool, *category_id)
                    .await?
                    .filter(|c| c.is_active);
                if found.is_none() {
                    return Err(AppError::with_message(
                        ErrorCode::AssignmentTargetInvalid,
                        format!("Category {category_id} not found"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn invalidate_target(&self, target: &AssignmentTarget) {
        match target {
            AssignmentTarget::Sku { item_sku } => self.resolver.invalidate(item_sku),
            AssignmentTarget::Category { .. } => self.resolver.invalidate_all(),
        }
    }
}

fn template_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TemplateNotFound, format!("Template {id} not found"))
        .with_detail("template_id", id)
}
