//! Unified error system for the storefront inventory engine
//!
//! This module provides a comprehensive error handling system with:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (items, categories, templates, assignments)
//! - 7xxx: Variant and stock errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::TemplateNotFound);
//!
//! // Create an error with custom message
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Invalid cascade order");
//!
//! // Create an error with details
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "template_name");
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod codes;
mod types;

pub use codes::{ErrorCategory, ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
