//! Storage errors for specification files and the audit database.

use super::error_code::{self, GaitErrorCode};
use super::SpecificationError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("unsupported specification format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("invalid specification: {0}")]
    InvalidSpecification(#[from] SpecificationError),
}

impl GaitErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::InvalidSpecification(e) => e.error_code(),
            _ => error_code::STORAGE_ERROR,
        }
    }
}
