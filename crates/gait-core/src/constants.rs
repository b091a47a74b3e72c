//! Shared constants for gait stride validation.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Phase grid ----

/// Number of samples per normalized gait cycle.
pub const SAMPLES_PER_CYCLE: usize = 150;

/// Phase percentages consulted during classification.
pub const REPRESENTATIVE_PHASE_PERCENTS: [u8; 4] = [0, 25, 50, 75];

// ---- Classifier ----

/// A violation within this fraction of the range width beyond a bound is minor.
pub const DEFAULT_MINOR_FRACTION: f64 = 0.10;

// ---- Batch engine ----

/// Default strides per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Chunk size floor when degrading under a memory budget.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 8;

/// Default worker count (0 = rayon auto-detect).
pub const DEFAULT_THREADS: usize = 0;

/// Default maximum strides accepted by one batch.
pub const DEFAULT_MAX_STRIDES: usize = 5_000_000;

/// Default working-memory budget for in-flight chunks (512 MiB).
pub const DEFAULT_MEMORY_BUDGET_BYTES: u64 = 512 * 1024 * 1024;

/// Default wall-time budget for one batch (30 minutes).
pub const DEFAULT_TIME_BUDGET_MS: u64 = 30 * 60 * 1000;

/// Default tolerated fraction of structurally failed strides.
pub const DEFAULT_MAX_STRUCTURAL_FAILURE_FRACTION: f64 = 0.5;

/// Default length of the ranked rejection-reason list.
pub const DEFAULT_TOP_REASONS: usize = 10;

/// Approximate per-verdict bookkeeping overhead used in memory estimates.
pub const VERDICT_OVERHEAD_BYTES: u64 = 256;

// ---- Tuner ----

/// Default minimum number of finite samples for a proposal.
pub const DEFAULT_MIN_TUNING_SAMPLES: usize = 10;

/// Default central coverage for symmetric percentile cutoffs.
pub const DEFAULT_PERCENTILE_COVERAGE: f64 = 0.95;

/// Default multiplier for mean ± k·stddev.
pub const DEFAULT_STD_MULTIPLIER: f64 = 1.96;

/// Default Tukey fence multiplier.
pub const DEFAULT_TUKEY_MULTIPLIER: f64 = 1.5;

// ---- Audit ----

/// Default maximum entries returned by an audit query.
pub const DEFAULT_AUDIT_QUERY_LIMIT: usize = 1_000;
