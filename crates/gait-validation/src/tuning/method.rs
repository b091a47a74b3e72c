//! Range derivation methods over a finite sample set.

use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use gait_core::config::TunerConfig;
use gait_core::errors::TuningError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TuningMethod {
    /// Central `coverage` interval from empirical quantiles.
    SymmetricPercentile { coverage: f64 },
    /// `mean ± k · sample stddev`.
    MeanStd { k: f64 },
    /// Tukey fences: `[Q1 − k·IQR, Q3 + k·IQR]`.
    Tukey { k: f64 },
}

impl TuningMethod {
    pub fn percentile_from_config(config: &TunerConfig) -> Self {
        Self::SymmetricPercentile {
            coverage: config.effective_percentile_coverage(),
        }
    }

    pub fn mean_std_from_config(config: &TunerConfig) -> Self {
        Self::MeanStd {
            k: config.effective_std_multiplier(),
        }
    }

    pub fn tukey_from_config(config: &TunerConfig) -> Self {
        Self::Tukey {
            k: config.effective_tukey_multiplier(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SymmetricPercentile { .. } => "symmetric_percentile",
            Self::MeanStd { .. } => "mean_std",
            Self::Tukey { .. } => "tukey",
        }
    }

    pub fn check_parameters(&self) -> Result<(), TuningError> {
        let invalid = |parameter: &str, message: &str| TuningError::InvalidParameter {
            parameter: parameter.to_string(),
            message: message.to_string(),
        };
        match *self {
            Self::SymmetricPercentile { coverage } => {
                if !(coverage > 0.0 && coverage < 1.0) {
                    return Err(invalid("coverage", "must be in (0.0, 1.0)"));
                }
            }
            Self::MeanStd { k } => {
                if !(k.is_finite() && k > 0.0) {
                    return Err(invalid("k", "must be finite and greater than 0.0"));
                }
            }
            Self::Tukey { k } => {
                if !(k.is_finite() && k >= 0.0) {
                    return Err(invalid("k", "must be finite and >= 0.0"));
                }
            }
        }
        Ok(())
    }

    /// Derive `(min, max)` from finite samples. Caller enforces the sample minimum.
    pub(crate) fn bounds(&self, samples: &[f64]) -> (f64, f64) {
        match *self {
            Self::SymmetricPercentile { coverage } => {
                let tail = (1.0 - coverage) / 2.0;
                let mut data = Data::new(samples.to_vec());
                (data.quantile(tail), data.quantile(1.0 - tail))
            }
            Self::MeanStd { k } => {
                let mean = samples.iter().mean();
                let std = samples.iter().std_dev();
                (mean - k * std, mean + k * std)
            }
            Self::Tukey { k } => {
                let mut data = Data::new(samples.to_vec());
                let q1 = data.lower_quartile();
                let q3 = data.upper_quartile();
                let iqr = q3 - q1;
                (q1 - k * iqr, q3 + k * iqr)
            }
        }
    }
}

impl fmt::Display for TuningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymmetricPercentile { coverage } => {
                write!(f, "symmetric {:.1}% percentile", coverage * 100.0)
            }
            Self::MeanStd { k } => write!(f, "mean ± {k}·sd"),
            Self::Tukey { k } => write!(f, "Tukey fences k={k}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(TuningMethod::SymmetricPercentile { coverage: 1.0 }
            .check_parameters()
            .is_err());
        assert!(TuningMethod::MeanStd { k: 0.0 }.check_parameters().is_err());
        assert!(TuningMethod::Tukey { k: f64::NAN }.check_parameters().is_err());
        assert!(TuningMethod::Tukey { k: 0.0 }.check_parameters().is_ok());
    }

    #[test]
    fn mean_std_on_known_samples() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (lo, hi) = TuningMethod::MeanStd { k: 1.0 }.bounds(&samples);
        let sd = 2.5f64.sqrt();
        assert!((lo - (3.0 - sd)).abs() < 1e-12);
        assert!((hi - (3.0 + sd)).abs() < 1e-12);
    }
}
