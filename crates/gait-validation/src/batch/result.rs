//! Batch validation results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gait_core::config::MissingRangePolicy;
use gait_core::errors::StructuralError;
use gait_core::types::{Phase, StrideId, Task, Variable};

use super::tally::{Counter, PartialTally, RejectionReason};
use crate::classify::{RejectionRecord, Severity};
use crate::ingest::RejectedGroup;
use crate::spec::{RangeKey, SpecRevision, VersionId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassRate {
    pub passed: u64,
    pub total: u64,
    pub rate: f64,
}

impl From<Counter> for PassRate {
    fn from(c: Counter) -> Self {
        Self {
            passed: c.passed,
            total: c.total,
            rate: ratio(c.passed, c.total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckPassRate {
    pub key: RangeKey,
    pub passed: u64,
    pub total: u64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReason {
    pub reason: RejectionReason,
    pub count: u64,
}

/// Keep/reject decision for one input stride, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrideDecision {
    pub index: usize,
    pub stride: StrideId,
    pub keep: bool,
}

/// A stride that could not be classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralFailure {
    pub index: usize,
    pub stride: StrideId,
    pub error: StructuralError,
}

/// Dataset shape verdict, independent of the stride pass rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStructure {
    pub valid: bool,
    pub issues: Vec<StructuralError>,
    pub rejected_groups: Vec<RejectedGroup>,
    /// Structurally failed strides plus rejected groups, over all groups.
    pub structural_failure_fraction: f64,
}

impl DatasetStructure {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn assess(
        tally: &PartialTally,
        mut issues: Vec<StructuralError>,
        rejected_groups: Vec<RejectedGroup>,
        max_failure_fraction: f64,
    ) -> Self {
        let groups = tally.total + rejected_groups.len() as u64;
        let failed = tally.structural + rejected_groups.len() as u64;
        if groups == 0 && !issues.contains(&StructuralError::EmptyDataset) {
            issues.push(StructuralError::EmptyDataset);
        }
        let structural_failure_fraction = ratio(failed, groups);
        let valid = groups > 0
            && issues.is_empty()
            && structural_failure_fraction <= max_failure_fraction;
        Self {
            valid,
            issues,
            rejected_groups,
            structural_failure_fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchValidationResult {
    pub spec_version: VersionId,
    pub spec_fingerprint: u64,
    pub missing_range_policy: MissingRangePolicy,

    pub total_strides: usize,
    pub valid_strides: usize,
    /// `total_strides - valid_strides`; includes structural failures.
    pub invalid_strides: usize,
    /// Strides rejected before any value was read. A subset of `invalid_strides`.
    pub structural_failures: usize,
    /// `valid_strides / total_strides`, 0.0 for an empty batch.
    pub pass_rate: f64,
    pub skipped_checks: u64,

    pub per_task: BTreeMap<Task, PassRate>,
    pub per_variable: BTreeMap<Variable, PassRate>,
    pub per_phase: BTreeMap<Phase, PassRate>,
    pub per_check: Vec<CheckPassRate>,
    pub top_rejection_reasons: Vec<RankedReason>,
    pub severity_counts: BTreeMap<Severity, u64>,

    pub decisions: Vec<StrideDecision>,
    pub rejections: Vec<RejectionRecord>,
    pub structural: Vec<StructuralFailure>,

    pub structure: DatasetStructure,
    /// False only when the structure is invalid and no stride passed.
    pub validation_passed: bool,
}

impl BatchValidationResult {
    pub(crate) fn from_tally(
        tally: PartialTally,
        revision: &SpecRevision,
        policy: MissingRangePolicy,
        structure: DatasetStructure,
        top_reasons: usize,
    ) -> Self {
        let mut ranked: Vec<RankedReason> = tally
            .reasons
            .into_iter()
            .map(|(reason, count)| RankedReason { reason, count })
            .collect();
        // Stable sort over key-ordered input: ties stay in key order.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(top_reasons);

        let per_check = tally
            .per_check
            .into_iter()
            .map(|(key, c)| CheckPassRate {
                key,
                passed: c.passed,
                total: c.total,
                rate: ratio(c.passed, c.total),
            })
            .collect();

        let valid_strides = tally.valid as usize;
        let validation_passed = valid_strides > 0 || structure.is_valid();

        Self {
            spec_version: revision.version,
            spec_fingerprint: revision.fingerprint,
            missing_range_policy: policy,
            total_strides: tally.total as usize,
            valid_strides,
            invalid_strides: tally.invalid as usize,
            structural_failures: tally.structural as usize,
            pass_rate: ratio(tally.valid, tally.total),
            skipped_checks: tally.skipped_checks,
            per_task: to_rates(tally.per_task),
            per_variable: to_rates(tally.per_variable),
            per_phase: to_rates(tally.per_phase),
            per_check,
            top_rejection_reasons: ranked,
            severity_counts: tally.severities,
            decisions: tally.decisions.into_values().collect(),
            rejections: tally.rejections.into_values().flatten().collect(),
            structural: tally.structural_failures.into_values().collect(),
            structure,
            validation_passed,
        }
    }

    /// Input indices of kept strides.
    pub fn kept_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.decisions.iter().filter(|d| d.keep).map(|d| d.index)
    }

    pub fn rejections_for<'a>(
        &'a self,
        stride: &'a StrideId,
    ) -> impl Iterator<Item = &'a RejectionRecord> + 'a {
        self.rejections.iter().filter(move |r| &r.stride == stride)
    }

    pub fn check_rate(&self, key: &RangeKey) -> Option<&CheckPassRate> {
        self.per_check.iter().find(|c| &c.key == key)
    }
}

fn to_rates<K: Ord>(counters: BTreeMap<K, Counter>) -> BTreeMap<K, PassRate> {
    counters.into_iter().map(|(k, c)| (k, c.into())).collect()
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
