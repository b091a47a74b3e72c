//! Batch validation engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_STRIDES, DEFAULT_MAX_STRUCTURAL_FAILURE_FRACTION,
    DEFAULT_MEMORY_BUDGET_BYTES, DEFAULT_MIN_CHUNK_SIZE, DEFAULT_THREADS,
    DEFAULT_TIME_BUDGET_MS, DEFAULT_TOP_REASONS,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Strides per chunk. Default: 256.
    pub chunk_size: Option<usize>,
    /// Smallest chunk the engine degrades to under memory pressure. Default: 8.
    pub min_chunk_size: Option<usize>,
    /// Worker threads (0 = auto-detect). Default: 0.
    pub threads: Option<usize>,
    /// Maximum strides per batch. Default: 5,000,000.
    pub max_strides: Option<usize>,
    /// Working-memory budget for in-flight chunks, in bytes. Default: 512 MiB.
    pub memory_budget_bytes: Option<u64>,
    /// Wall-time budget in milliseconds. Default: 30 minutes.
    pub time_budget_ms: Option<u64>,
    /// Structurally failed fraction above which the dataset shape is invalid. Default: 0.5.
    pub max_structural_failure_fraction: Option<f64>,
    /// Length of the ranked rejection-reason list. Default: 10.
    pub top_reasons: Option<usize>,
}

impl BatchConfig {
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    pub fn effective_min_chunk_size(&self) -> usize {
        self.min_chunk_size.unwrap_or(DEFAULT_MIN_CHUNK_SIZE)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }

    pub fn effective_max_strides(&self) -> usize {
        self.max_strides.unwrap_or(DEFAULT_MAX_STRIDES)
    }

    pub fn effective_memory_budget_bytes(&self) -> u64 {
        self.memory_budget_bytes.unwrap_or(DEFAULT_MEMORY_BUDGET_BYTES)
    }

    pub fn effective_time_budget_ms(&self) -> u64 {
        self.time_budget_ms.unwrap_or(DEFAULT_TIME_BUDGET_MS)
    }

    pub fn effective_max_structural_failure_fraction(&self) -> f64 {
        self.max_structural_failure_fraction
            .unwrap_or(DEFAULT_MAX_STRUCTURAL_FAILURE_FRACTION)
    }

    pub fn effective_top_reasons(&self) -> usize {
        self.top_reasons.unwrap_or(DEFAULT_TOP_REASONS)
    }
}
