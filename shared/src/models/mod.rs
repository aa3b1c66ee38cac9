//! Data models
//!
//! Shared between store-server and admin/storefront clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod cascade;
pub mod item;
pub mod option_link;
pub mod template;
pub mod variant;

// Re-exports
pub use cascade::*;
pub use item::*;
pub use option_link::*;
pub use template::*;
pub use variant::*;
