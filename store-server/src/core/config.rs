/// Server configuration
///
/// All values can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATABASE_PATH | store.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | OPTIONS_CACHE_TTL_MS | 5000 | Resolved-options cache TTL |
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// TTL for the per-SKU resolved-options cache, in milliseconds
    pub options_cache_ttl_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "store.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            options_cache_ttl_ms: std::env::var("OPTIONS_CACHE_TTL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
