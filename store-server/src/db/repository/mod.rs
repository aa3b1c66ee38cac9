//! Repository Module
//!
//! Free-function CRUD over the SQLite pool, one module per table group.

// Catalog
pub mod item;

// Templates
pub mod color_template;
pub mod size_template;

// Options
pub mod cascade_settings;
pub mod option_link;

// Variants
pub mod variant;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
