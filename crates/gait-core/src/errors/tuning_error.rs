//! Specification tuning errors.

use super::error_code::{self, GaitErrorCode};

/// Errors that can occur while deriving candidate ranges from samples.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TuningError {
    #[error("{available} finite samples available, at least {required} required")]
    InsufficientSamples { available: usize, required: usize },

    #[error("degenerate range derived: min {min} is not below max {max}")]
    DegenerateRange { min: f64, max: f64 },

    #[error("invalid method parameter {parameter}: {message}")]
    InvalidParameter { parameter: String, message: String },
}

impl GaitErrorCode for TuningError {
    fn error_code(&self) -> &'static str {
        error_code::TUNING_ERROR
    }
}
