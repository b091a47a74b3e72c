//! Verdicts and rejection records.

use std::fmt;

use serde::{Deserialize, Serialize};

use gait_core::types::{Phase, StrideId, Variable};

use crate::spec::{Range, VersionId};

/// How bad a violation is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Minor, Self::Major, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    BelowMin,
    AboveMax,
    NonFinite,
    /// No range exists and the classifier runs fail-closed.
    MissingRange,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelowMin => "below_min",
            Self::AboveMax => "above_max",
            Self::NonFinite => "non_finite",
            Self::MissingRange => "missing_range",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check of one stride. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub stride: StrideId,
    pub variable: Variable,
    pub phase: Phase,
    /// `None` when the sample was NaN or infinite.
    pub observed: Option<f64>,
    /// `None` for missing-range failures.
    pub range: Option<Range>,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub spec_version: VersionId,
}

/// Result of one evaluated `(variable, phase)` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub variable: Variable,
    pub phase: Phase,
    pub passed: bool,
}

/// Pass/fail for one stride. `valid` is the AND of all evaluated checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrideVerdict {
    pub stride: StrideId,
    pub valid: bool,
    pub violations: Vec<RejectionRecord>,
    pub checks: Vec<CheckOutcome>,
    /// Checks skipped because no range exists (skip policy only).
    pub skipped: Vec<(Variable, Phase)>,
}

impl StrideVerdict {
    pub fn max_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}
