//! Inclusive numeric plausibility range.

use serde::{Deserialize, Serialize};

use gait_core::errors::SpecificationError;

/// Which bound a value fell beyond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundSide {
    Below,
    Above,
}

/// Spec-supplied predicate marking a violation as physically impossible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriticalPredicate {
    /// The value's sign contradicts the sign shared by both bounds.
    /// Has no effect on ranges that straddle zero.
    OppositeSign,
    /// The value lies outside absolute physical limits.
    OutsideLimits { lower: f64, upper: f64 },
}

impl CriticalPredicate {
    pub fn matches(&self, range: &Range, value: f64) -> bool {
        match self {
            Self::OppositeSign => {
                if range.min >= 0.0 {
                    value < 0.0
                } else if range.max <= 0.0 {
                    value > 0.0
                } else {
                    false
                }
            }
            Self::OutsideLimits { lower, upper } => value < *lower || value > *upper,
        }
    }
}

/// `[min, max]` with inclusive bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<CriticalPredicate>,
}

impl Range {
    pub fn new(min: f64, max: f64, rationale: impl Into<String>) -> Self {
        Self {
            min,
            max,
            rationale: rationale.into(),
            critical: None,
        }
    }

    pub fn with_critical(mut self, critical: CriticalPredicate) -> Self {
        self.critical = Some(critical);
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Distance beyond the nearest violated bound, or `None` when inside.
    /// Non-finite values return `None`; callers check finiteness first.
    pub fn excess(&self, value: f64) -> Option<(BoundSide, f64)> {
        if value < self.min {
            Some((BoundSide::Below, self.min - value))
        } else if value > self.max {
            Some((BoundSide::Above, value - self.max))
        } else {
            None
        }
    }

    /// Check `min < max`, finite bounds, and that critical limits enclose the range.
    pub fn validate(&self, key: &str) -> Result<(), SpecificationError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SpecificationError::NonFiniteBound { key: key.to_string() });
        }
        if self.min >= self.max {
            return Err(SpecificationError::InvalidRange {
                key: key.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        if let Some(CriticalPredicate::OutsideLimits { lower, upper }) = &self.critical {
            if !lower.is_finite() || !upper.is_finite() {
                return Err(SpecificationError::NonFiniteBound {
                    key: format!("{key} critical limits"),
                });
            }
            if *lower > self.min || *upper < self.max {
                return Err(SpecificationError::InvalidRange {
                    key: format!("{key} critical limits"),
                    min: *lower,
                    max: *upper,
                });
            }
        }
        Ok(())
    }
}
