//! Stride classifier configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MINOR_FRACTION;

/// What the classifier does when no range exists for a required
/// (variable, phase). The choice is always recorded in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRangePolicy {
    /// Skip the check and count it as skipped.
    #[default]
    Skip,
    /// Treat the missing range as a failed check.
    FailClosed,
}

impl MissingRangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::FailClosed => "fail_closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Missing-range policy. Default: skip.
    pub missing_range_policy: Option<MissingRangePolicy>,
    /// Fraction of range width beyond a bound still graded minor. Default: 0.10.
    pub minor_fraction: Option<f64>,
}

impl ClassifierConfig {
    pub fn effective_missing_range_policy(&self) -> MissingRangePolicy {
        self.missing_range_policy.unwrap_or_default()
    }

    pub fn effective_minor_fraction(&self) -> f64 {
        self.minor_fraction.unwrap_or(DEFAULT_MINOR_FRACTION)
    }
}
