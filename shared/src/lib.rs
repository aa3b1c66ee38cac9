//! Shared types for the storefront inventory engine
//!
//! Common types used across crates: data models, the unified error system
//! (`ErrorCode` / `AppError` / `ApiResponse`) and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
