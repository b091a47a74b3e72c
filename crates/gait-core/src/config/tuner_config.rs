//! Specification tuner configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MIN_TUNING_SAMPLES, DEFAULT_PERCENTILE_COVERAGE, DEFAULT_STD_MULTIPLIER,
    DEFAULT_TUKEY_MULTIPLIER,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TunerConfig {
    /// Minimum finite samples required for a proposal. Default: 10.
    pub min_samples: Option<usize>,
    /// Central coverage for the symmetric percentile method. Default: 0.95.
    pub percentile_coverage: Option<f64>,
    /// k for mean ± k·stddev. Default: 1.96.
    pub std_multiplier: Option<f64>,
    /// k for Tukey fences. Default: 1.5.
    pub tukey_multiplier: Option<f64>,
}

impl TunerConfig {
    pub fn effective_min_samples(&self) -> usize {
        self.min_samples.unwrap_or(DEFAULT_MIN_TUNING_SAMPLES)
    }

    pub fn effective_percentile_coverage(&self) -> f64 {
        self.percentile_coverage.unwrap_or(DEFAULT_PERCENTILE_COVERAGE)
    }

    pub fn effective_std_multiplier(&self) -> f64 {
        self.std_multiplier.unwrap_or(DEFAULT_STD_MULTIPLIER)
    }

    pub fn effective_tukey_multiplier(&self) -> f64 {
        self.tukey_multiplier.unwrap_or(DEFAULT_TUKEY_MULTIPLIER)
    }
}
