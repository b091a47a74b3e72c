//! Per-chunk tallies and their reduction.
//!
//! Tallies hold integer counts in ordered maps plus per-stride output keyed
//! by input index, so `combine` is associative and commutative and the final
//! result does not depend on how strides were chunked or scheduled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gait_core::errors::StructuralError;
use gait_core::types::{Phase, Stride, Task, Variable};

use super::result::{StrideDecision, StructuralFailure};
use crate::classify::{RejectionRecord, Severity, StrideVerdict, ViolationKind};
use crate::spec::RangeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counter {
    pub passed: u64,
    pub total: u64,
}

impl Counter {
    pub fn add(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        }
    }

    pub fn merge(&mut self, other: Counter) {
        self.passed += other.passed;
        self.total += other.total;
    }
}

/// Key under which rejections are counted for ranking.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    Range {
        kind: ViolationKind,
        task: Task,
        variable: Variable,
        phase: Phase,
    },
    Structural {
        tag: String,
    },
}

impl RejectionReason {
    pub fn from_record(record: &RejectionRecord) -> Self {
        Self::Range {
            kind: record.kind,
            task: record.stride.task,
            variable: record.variable,
            phase: record.phase,
        }
    }

    pub fn from_structural(error: &StructuralError) -> Self {
        Self::Structural {
            tag: error.kind_tag().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartialTally {
    pub total: u64,
    pub valid: u64,
    /// Every rejected stride, structural failures included.
    pub invalid: u64,
    /// The structurally failed subset of `invalid`.
    pub structural: u64,
    pub skipped_checks: u64,
    pub per_task: BTreeMap<Task, Counter>,
    pub per_variable: BTreeMap<Variable, Counter>,
    pub per_phase: BTreeMap<Phase, Counter>,
    pub per_check: BTreeMap<RangeKey, Counter>,
    pub reasons: BTreeMap<RejectionReason, u64>,
    pub severities: BTreeMap<Severity, u64>,
    pub decisions: BTreeMap<usize, StrideDecision>,
    pub rejections: BTreeMap<usize, Vec<RejectionRecord>>,
    pub structural_failures: BTreeMap<usize, StructuralFailure>,
}

impl PartialTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one classified stride at input position `index`.
    pub fn record_verdict(&mut self, index: usize, verdict: StrideVerdict) {
        let task = verdict.stride.task;
        self.total += 1;
        if verdict.valid {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        self.per_task.entry(task).or_default().add(verdict.valid);
        self.skipped_checks += verdict.skipped.len() as u64;

        for check in &verdict.checks {
            self.per_variable
                .entry(check.variable)
                .or_default()
                .add(check.passed);
            self.per_phase.entry(check.phase).or_default().add(check.passed);
            self.per_check
                .entry(RangeKey::new(task, check.variable, check.phase))
                .or_default()
                .add(check.passed);
        }
        for record in &verdict.violations {
            *self
                .reasons
                .entry(RejectionReason::from_record(record))
                .or_default() += 1;
            *self.severities.entry(record.severity).or_default() += 1;
        }

        self.decisions.insert(
            index,
            StrideDecision {
                index,
                stride: verdict.stride,
                keep: verdict.valid,
            },
        );
        if !verdict.violations.is_empty() {
            self.rejections.insert(index, verdict.violations);
        }
    }

    /// Fold one stride that failed the structure check.
    pub fn record_structural(&mut self, index: usize, stride: &Stride, error: StructuralError) {
        self.total += 1;
        self.invalid += 1;
        self.structural += 1;
        self.per_task.entry(stride.task()).or_default().add(false);
        *self
            .reasons
            .entry(RejectionReason::from_structural(&error))
            .or_default() += 1;
        self.decisions.insert(
            index,
            StrideDecision {
                index,
                stride: stride.id.clone(),
                keep: false,
            },
        );
        self.structural_failures.insert(
            index,
            StructuralFailure {
                index,
                stride: stride.id.clone(),
                error,
            },
        );
    }

    /// Merge two tallies over disjoint stride sets.
    pub fn combine(mut self, other: PartialTally) -> PartialTally {
        self.total += other.total;
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.structural += other.structural;
        self.skipped_checks += other.skipped_checks;
        merge_counters(&mut self.per_task, other.per_task);
        merge_counters(&mut self.per_variable, other.per_variable);
        merge_counters(&mut self.per_phase, other.per_phase);
        merge_counters(&mut self.per_check, other.per_check);
        for (reason, n) in other.reasons {
            *self.reasons.entry(reason).or_default() += n;
        }
        for (severity, n) in other.severities {
            *self.severities.entry(severity).or_default() += n;
        }
        self.decisions.extend(other.decisions);
        self.rejections.extend(other.rejections);
        self.structural_failures.extend(other.structural_failures);
        self
    }
}

fn merge_counters<K: Ord>(into: &mut BTreeMap<K, Counter>, from: BTreeMap<K, Counter>) {
    for (key, counter) in from {
        into.entry(key).or_default().merge(counter);
    }
}
