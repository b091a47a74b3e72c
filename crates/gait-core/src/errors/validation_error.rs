//! Top-level validation errors.

use super::error_code::{self, GaitErrorCode};
use super::{ConfigError, ResourceError, SpecificationError, StructuralError, TuningError};

/// Errors that abort a validation or tuning run.
/// Aggregates subsystem errors via `From` conversions.
/// Range violations are never errors; they are reported as data.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Specification error: {0}")]
    Specification(#[from] SpecificationError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Tuning error: {0}")]
    Tuning(#[from] TuningError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation cancelled after {processed} of {total} strides")]
    Cancelled { processed: usize, total: usize },
}

impl GaitErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Structural(e) => e.error_code(),
            Self::Specification(e) => e.error_code(),
            Self::Resource(e) => e.error_code(),
            Self::Tuning(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Cancelled { .. } => error_code::CANCELLED,
        }
    }
}
