//! Unified error codes for the storefront inventory engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (items, categories, templates, assignments)
//! - 7xxx: Variant / stock errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 6xxx: Catalog ====================
    /// Item not found
    ItemNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has active items
    CategoryHasItems = 6102,
    /// Template not found
    TemplateNotFound = 6201,
    /// Template is still assigned to items/categories
    TemplateInUse = 6202,
    /// Template has no item rows
    TemplateEmpty = 6203,
    /// Assignment not found
    AssignmentNotFound = 6301,
    /// Assignment target invalid (wrong sku/category pairing)
    AssignmentTargetInvalid = 6302,
    /// Item color not found
    ColorNotFound = 6401,

    // ==================== 7xxx: Variants / Stock ====================
    /// Variant not found
    VariantNotFound = 7101,
    /// Variant is out of stock
    VariantOutOfStock = 7102,
    /// Stock level may not be negative
    NegativeStock = 7103,
    /// Storefront selection does not match any variant
    SelectionInvalid = 7104,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

/// Error category, used for logging decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    General,
    Catalog,
    Inventory,
    System,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Catalog
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has active items",
            ErrorCode::TemplateNotFound => "Template not found",
            ErrorCode::TemplateInUse => "Template is still assigned to items or categories",
            ErrorCode::TemplateEmpty => "Template has no rows",
            ErrorCode::AssignmentNotFound => "Assignment not found",
            ErrorCode::AssignmentTargetInvalid => "Assignment target is invalid",
            ErrorCode::ColorNotFound => "Item color not found",

            // Variants / Stock
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::VariantOutOfStock => "Variant is out of stock",
            ErrorCode::NegativeStock => "Stock level may not be negative",
            ErrorCode::SelectionInvalid => "Selection does not match any variant",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Get the error category for this code
    pub const fn category(&self) -> ErrorCategory {
        match self.code() {
            0..=999 => ErrorCategory::General,
            6000..=6999 => ErrorCategory::Catalog,
            7000..=7999 => ErrorCategory::Inventory,
            _ => ErrorCategory::System,
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            ErrorCode::Success => StatusCode::OK,
            ErrorCode::ValidationFailed | ErrorCode::InvalidRequest | ErrorCode::NegativeStock => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::NotFound
            | ErrorCode::ItemNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::TemplateNotFound
            | ErrorCode::AssignmentNotFound
            | ErrorCode::ColorNotFound
            | ErrorCode::VariantNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists
            | ErrorCode::TemplateInUse
            | ErrorCode::CategoryHasItems => StatusCode::CONFLICT,
            ErrorCode::TemplateEmpty
            | ErrorCode::AssignmentTargetInvalid
            | ErrorCode::VariantOutOfStock
            | ErrorCode::SelectionInvalid => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ErrorCode::*;
        let code = match value {
            0 => Success,
            1 => Unknown,
            2 => ValidationFailed,
            3 => NotFound,
            4 => AlreadyExists,
            5 => InvalidRequest,
            6001 => ItemNotFound,
            6101 => CategoryNotFound,
            6102 => CategoryHasItems,
            6201 => TemplateNotFound,
            6202 => TemplateInUse,
            6203 => TemplateEmpty,
            6301 => AssignmentNotFound,
            6302 => AssignmentTargetInvalid,
            6401 => ColorNotFound,
            7101 => VariantNotFound,
            7102 => VariantOutOfStock,
            7103 => NegativeStock,
            7104 => SelectionInvalid,
            9001 => InternalError,
            9002 => DatabaseError,
            9005 => ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TemplateInUse,
            ErrorCode::VariantNotFound,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert!(ErrorCode::try_from(12345).is_err());
    }

    #[test]
    fn test_categories() {
        assert_eq!(ErrorCode::NotFound.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TemplateInUse.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::NegativeStock.category(), ErrorCategory::Inventory);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_http_status() {
        use http::StatusCode;
        assert_eq!(ErrorCode::TemplateNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TemplateInUse.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
    }
}
