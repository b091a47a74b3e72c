//! What-if comparison of a proposed revision against its base.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use gait_core::errors::ValidationError;
use gait_core::types::{Phase, Stride, StrideId, Task, Variable};

use crate::batch::{BatchValidationEngine, BatchValidationResult, PassRate};
use crate::spec::{ProposedRevision, RangeKey, SpecDiff, VersionId};

/// Pass rate of one group before and after. A side is `None` when the group
/// had no checks under that revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDelta<K> {
    pub key: K,
    pub before: Option<f64>,
    pub after: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub base_version: VersionId,
    pub candidate_fingerprint: u64,
    pub diff: SpecDiff,
    pub strides: usize,
    pub base_pass_rate: f64,
    pub candidate_pass_rate: f64,
    pub pass_rate_delta: f64,
    pub per_task: Vec<RateDelta<Task>>,
    pub per_variable: Vec<RateDelta<Variable>>,
    pub per_phase: Vec<RateDelta<Phase>>,
    pub per_check: Vec<RateDelta<RangeKey>>,
    /// Kept under the base, rejected under the candidate.
    pub newly_rejected: Vec<StrideId>,
    /// Rejected under the base, kept under the candidate.
    pub newly_accepted: Vec<StrideId>,
}

/// Validate `reference` against the proposal's base and against the
/// materialized candidate, without storing the candidate or writing audit
/// entries.
pub fn impact_analysis(
    engine: &BatchValidationEngine,
    proposed: &ProposedRevision,
    reference: &[Stride],
) -> Result<ImpactReport, ValidationError> {
    let store = engine.store();
    let base = store.snapshot(proposed.base)?;
    let candidate = store.preview(proposed)?;

    let before = engine.evaluate(reference, &base)?;
    let after = engine.evaluate(reference, &candidate)?;

    let mut newly_rejected = Vec::new();
    let mut newly_accepted = Vec::new();
    for (b, a) in before.decisions.iter().zip(&after.decisions) {
        match (b.keep, a.keep) {
            (true, false) => newly_rejected.push(b.stride.clone()),
            (false, true) => newly_accepted.push(b.stride.clone()),
            _ => {}
        }
    }

    let report = ImpactReport {
        base_version: base.version,
        candidate_fingerprint: candidate.fingerprint,
        diff: candidate.diff.clone(),
        strides: reference.len(),
        base_pass_rate: before.pass_rate,
        candidate_pass_rate: after.pass_rate,
        pass_rate_delta: after.pass_rate - before.pass_rate,
        per_task: deltas(&before.per_task, &after.per_task),
        per_variable: deltas(&before.per_variable, &after.per_variable),
        per_phase: deltas(&before.per_phase, &after.per_phase),
        per_check: check_deltas(&before, &after),
        newly_rejected,
        newly_accepted,
    };
    tracing::info!(
        base = %report.base_version,
        changes = report.diff.change_count(),
        strides = report.strides,
        pass_rate_delta = report.pass_rate_delta,
        newly_rejected = report.newly_rejected.len(),
        newly_accepted = report.newly_accepted.len(),
        "impact analysis complete"
    );
    Ok(report)
}

fn deltas<K: Ord + Copy>(
    before: &BTreeMap<K, PassRate>,
    after: &BTreeMap<K, PassRate>,
) -> Vec<RateDelta<K>> {
    let keys: BTreeSet<K> = before.keys().chain(after.keys()).copied().collect();
    keys.into_iter()
        .map(|key| {
            let b = before.get(&key).map(|r| r.rate);
            let a = after.get(&key).map(|r| r.rate);
            RateDelta {
                key,
                before: b,
                after: a,
                delta: b.zip(a).map(|(b, a)| a - b),
            }
        })
        .collect()
}

fn check_deltas(
    before: &BatchValidationResult,
    after: &BatchValidationResult,
) -> Vec<RateDelta<RangeKey>> {
    let by_key = |result: &BatchValidationResult| -> BTreeMap<RangeKey, PassRate> {
        result
            .per_check
            .iter()
            .map(|c| {
                let rate = PassRate {
                    passed: c.passed,
                    total: c.total,
                    rate: c.rate,
                };
                (c.key, rate)
            })
            .collect()
    };
    deltas(&by_key(before), &by_key(after))
}
