//! StrideClassifier: structure check, then one range check per
//! (required variable, representative phase).

use gait_core::config::{ClassifierConfig, MissingRangePolicy};
use gait_core::constants::{DEFAULT_MINOR_FRACTION, SAMPLES_PER_CYCLE};
use gait_core::errors::StructuralError;
use gait_core::types::{Phase, Stride, Variable};

use super::record::{CheckOutcome, RejectionRecord, Severity, StrideVerdict, ViolationKind};
use crate::resolver::{RangeLookup, RangeResolver};
use crate::spec::{BoundSide, Range, SpecRevision, ValidationSpecification};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrideClassifier {
    policy: MissingRangePolicy,
    minor_fraction: f64,
}

impl Default for StrideClassifier {
    fn default() -> Self {
        Self::new(MissingRangePolicy::default(), DEFAULT_MINOR_FRACTION)
    }
}

impl StrideClassifier {
    pub fn new(policy: MissingRangePolicy, minor_fraction: f64) -> Self {
        Self {
            policy,
            minor_fraction,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config.effective_missing_range_policy(),
            config.effective_minor_fraction(),
        )
    }

    pub fn policy(&self) -> MissingRangePolicy {
        self.policy
    }

    pub fn minor_fraction(&self) -> f64 {
        self.minor_fraction
    }

    /// Verify shape before any value is read and return the variables to check.
    ///
    /// For a specified task these are its required variables, each of which must
    /// be present with exactly `SAMPLES_PER_CYCLE` samples. For a task the
    /// specification does not cover, the stride's own curves are checked for
    /// length and returned.
    pub fn check_structure(
        &self,
        stride: &Stride,
        spec: &ValidationSpecification,
    ) -> Result<Vec<Variable>, StructuralError> {
        let candidates: Vec<Variable> = match spec.required_variables(stride.task()) {
            Some(required) => required.iter().copied().collect(),
            None => stride.curves.keys().copied().collect(),
        };

        for &variable in &candidates {
            let curve = stride
                .curve(variable)
                .ok_or_else(|| StructuralError::MissingVariable {
                    task: stride.task().to_string(),
                    variable: variable.to_string(),
                })?;
            if curve.len() != SAMPLES_PER_CYCLE {
                return Err(StructuralError::WrongPointCount {
                    variable: variable.to_string(),
                    expected: SAMPLES_PER_CYCLE,
                    actual: curve.len(),
                });
            }
        }
        Ok(candidates)
    }

    /// Classify one stride. Only structural problems are errors; every bad
    /// value becomes a `RejectionRecord` in the verdict.
    pub fn classify(
        &self,
        stride: &Stride,
        revision: &SpecRevision,
    ) -> Result<StrideVerdict, StructuralError> {
        let variables = self.check_structure(stride, &revision.specification)?;
        let resolver = RangeResolver::new(revision);
        let task = stride.task();

        let mut violations = Vec::new();
        let mut checks = Vec::with_capacity(variables.len() * 4);
        let mut skipped = Vec::new();

        for variable in variables {
            for phase in Phase::representative() {
                let range = match resolver.resolve(task, variable, phase) {
                    RangeLookup::Found(range) => range,
                    RangeLookup::NotFound(_) => match self.policy {
                        MissingRangePolicy::Skip => {
                            skipped.push((variable, phase));
                            continue;
                        }
                        MissingRangePolicy::FailClosed => {
                            checks.push(CheckOutcome {
                                variable,
                                phase,
                                passed: false,
                            });
                            violations.push(RejectionRecord {
                                stride: stride.id.clone(),
                                variable,
                                phase,
                                observed: stride.value_at(variable, phase).filter(|v| v.is_finite()),
                                range: None,
                                kind: ViolationKind::MissingRange,
                                severity: Severity::Major,
                                spec_version: revision.version,
                            });
                            continue;
                        }
                    },
                };

                // Length was checked above, so the sample exists.
                let value = stride.value_at(variable, phase).unwrap_or(f64::NAN);
                let outcome = self.check_value(range, value);
                checks.push(CheckOutcome {
                    variable,
                    phase,
                    passed: outcome.is_none(),
                });
                if let Some((kind, severity)) = outcome {
                    violations.push(RejectionRecord {
                        stride: stride.id.clone(),
                        variable,
                        phase,
                        observed: value.is_finite().then_some(value),
                        range: Some(range.clone()),
                        kind,
                        severity,
                        spec_version: revision.version,
                    });
                }
            }
        }

        Ok(StrideVerdict {
            stride: stride.id.clone(),
            valid: violations.is_empty(),
            violations,
            checks,
            skipped,
        })
    }

    /// `None` if `value` passes, otherwise the violation kind and severity.
    pub fn check_value(&self, range: &Range, value: f64) -> Option<(ViolationKind, Severity)> {
        if !value.is_finite() {
            return Some((ViolationKind::NonFinite, Severity::Critical));
        }
        let (side, excess) = range.excess(value)?;
        let kind = match side {
            BoundSide::Below => ViolationKind::BelowMin,
            BoundSide::Above => ViolationKind::AboveMax,
        };
        let severity = if range.critical.as_ref().is_some_and(|c| c.matches(range, value)) {
            Severity::Critical
        } else if excess <= self.minor_fraction * range.width() {
            Severity::Minor
        } else {
            Severity::Major
        };
        Some((kind, severity))
    }
}
