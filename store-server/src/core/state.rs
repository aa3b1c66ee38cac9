use crate::core::Config;
use crate::db::DbService;
use crate::options::{CascadeResolver, MatrixManager, StockSynchronizer, TemplateService};
use shared::error::AppError;

/// Server state, holding shared references to every service
///
/// Cheap to clone: the pool and the resolver cache are shared behind
/// `Arc` internally.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Database service (SQLite pool)
    pub db: DbService,
    /// Cascade resolver (with short-TTL per-SKU cache)
    pub resolver: CascadeResolver,
    /// Variant matrix manager
    pub matrix: MatrixManager,
    /// Stock synchronizer
    pub stock: StockSynchronizer,
    /// Template store and assignment ledger
    pub templates: TemplateService,
}

impl ServerState {
    /// Initialize all services against a fresh database connection
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Build the state around an existing database service
    pub fn with_db(config: Config, db: DbService) -> Self {
        let resolver = CascadeResolver::new(db.pool.clone(), config.options_cache_ttl_ms);
        let matrix = MatrixManager::new(db.pool.clone(), resolver.clone());
        let stock = StockSynchronizer::new(db.pool.clone());
        let templates =
            TemplateService::new(db.pool.clone(), resolver.clone(), matrix.clone());
        Self {
            config,
            db,
            resolver,
            matrix,
            stock,
            templates,
        }
    }
}
