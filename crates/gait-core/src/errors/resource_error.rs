//! Resource budget errors for batch validation.

use super::error_code::{self, GaitErrorCode};

/// A batch exceeded a configured budget. Input is never truncated;
/// the run is reported as failed instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("batch of {strides} strides exceeds limit of {limit}")]
    TooManyStrides { strides: usize, limit: usize },

    #[error("estimated working memory {required} bytes exceeds budget {budget} at minimum chunk size {chunk_size}")]
    MemoryBudgetExceeded {
        required: u64,
        budget: u64,
        chunk_size: usize,
    },

    #[error("batch exceeded time budget of {budget_ms}ms after {processed} of {total} strides")]
    TimeBudgetExceeded {
        budget_ms: u64,
        processed: usize,
        total: usize,
    },

    #[error("failed to build worker pool: {message}")]
    WorkerPool { message: String },
}

impl GaitErrorCode for ResourceError {
    fn error_code(&self) -> &'static str {
        error_code::RESOURCE_ERROR
    }
}
