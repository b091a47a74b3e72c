//! SpecificationTuner: proposes ranges from empirical samples.

use std::collections::BTreeSet;

use gait_core::config::TunerConfig;
use gait_core::constants::SAMPLES_PER_CYCLE;
use gait_core::errors::TuningError;
use gait_core::types::{Phase, Stride, Task, Variable};

use super::method::TuningMethod;
use crate::classify::StrideClassifier;
use crate::spec::{ProposalBuilder, ProposedRevision, Range, RangeKey, RevisionSource, SpecRevision};

/// A check for which no range could be derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedProposal {
    pub key: RangeKey,
    pub error: TuningError,
}

/// Output of `tune_task`: a staged proposal plus the checks it could not cover.
#[derive(Debug, Clone)]
pub struct TuningOutcome {
    pub proposal: ProposedRevision,
    pub skipped: Vec<SkippedProposal>,
    /// Strides of the task that failed the structure check and contributed
    /// no samples.
    pub excluded_strides: usize,
}

#[derive(Debug, Clone)]
pub struct SpecificationTuner {
    min_samples: usize,
}

impl Default for SpecificationTuner {
    fn default() -> Self {
        Self::new(&TunerConfig::default())
    }
}

impl SpecificationTuner {
    pub fn new(config: &TunerConfig) -> Self {
        Self {
            min_samples: config.effective_min_samples(),
        }
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Derive one range. Non-finite samples are dropped before counting.
    pub fn propose(
        &self,
        task: Task,
        variable: Variable,
        phase: Phase,
        samples: &[f64],
        method: TuningMethod,
    ) -> Result<Range, TuningError> {
        method.check_parameters()?;
        let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() < self.min_samples {
            return Err(TuningError::InsufficientSamples {
                available: finite.len(),
                required: self.min_samples,
            });
        }

        let (min, max) = method.bounds(&finite);
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(TuningError::DegenerateRange { min, max });
        }

        tracing::debug!(
            %task, %variable, %phase,
            method = method.name(),
            samples = finite.len(),
            dropped = samples.len() - finite.len(),
            min, max,
            "range proposed"
        );
        Ok(Range::new(
            min,
            max,
            format!("{method} over {} samples", finite.len()),
        ))
    }

    /// The `phase` sample of `variable` from every stride of `task` whose
    /// curve for `variable` has exactly `SAMPLES_PER_CYCLE` samples.
    pub fn samples_from_strides(
        strides: &[Stride],
        task: Task,
        variable: Variable,
        phase: Phase,
    ) -> Vec<f64> {
        phase_samples(strides.iter(), task, variable, phase)
    }

    /// Propose a range for every (variable, representative phase) of `task`.
    ///
    /// Variables are the task's required set in `base`, or, for a task the
    /// revision does not cover, every variable the task's strides carry.
    /// An existing critical predicate is carried over when it still encloses
    /// the new range.
    pub fn tune_task(
        &self,
        base: &SpecRevision,
        task: Task,
        strides: &[Stride],
        method: TuningMethod,
    ) -> Result<TuningOutcome, TuningError> {
        method.check_parameters()?;
        let spec = &base.specification;

        // Only strides that would pass classification's structure check feed
        // range derivation.
        let structure = StrideClassifier::default();
        let (usable, malformed): (Vec<&Stride>, Vec<&Stride>) = strides
            .iter()
            .filter(|s| s.task() == task)
            .partition(|s| structure.check_structure(s, spec).is_ok());
        if !malformed.is_empty() {
            tracing::warn!(
                %task,
                excluded = malformed.len(),
                "structurally malformed strides excluded from tuning"
            );
        }

        let variables: BTreeSet<Variable> = match spec.required_variables(task) {
            Some(required) => required.clone(),
            None => usable
                .iter()
                .flat_map(|s| s.curves.keys().copied())
                .collect(),
        };

        let mut builder = ProposalBuilder::new(base.version)
            .source(RevisionSource::Tuned {
                method: method.name().to_string(),
            })
            .rationale(format!("{method} tuning of {task}"));
        let mut skipped = Vec::new();

        for variable in variables {
            for phase in Phase::representative() {
                let key = RangeKey::new(task, variable, phase);
                let samples = phase_samples(usable.iter().copied(), task, variable, phase);
                let mut range = match self.propose(task, variable, phase, &samples, method) {
                    Ok(range) => range,
                    Err(error) => {
                        skipped.push(SkippedProposal { key, error });
                        continue;
                    }
                };

                let existing = spec.range(&key);
                if let Some(critical) = existing.and_then(|r| r.critical.clone()) {
                    let carried = range.clone().with_critical(critical);
                    if carried.validate(&key.to_string()).is_ok() {
                        range = carried;
                    }
                }
                if existing.is_some_and(|r| r.min == range.min && r.max == range.max) {
                    continue;
                }
                builder = builder.set_range(key, range);
            }
        }

        tracing::info!(
            %task,
            method = method.name(),
            proposed = builder.len(),
            skipped = skipped.len(),
            excluded = malformed.len(),
            base = %base.version,
            "task tuned"
        );
        Ok(TuningOutcome {
            proposal: builder.build(),
            skipped,
            excluded_strides: malformed.len(),
        })
    }
}

fn phase_samples<'a>(
    strides: impl Iterator<Item = &'a Stride>,
    task: Task,
    variable: Variable,
    phase: Phase,
) -> Vec<f64> {
    strides
        .filter(|s| s.task() == task)
        .filter(|s| s.curve(variable).is_some_and(|c| c.len() == SAMPLES_PER_CYCLE))
        .filter_map(|s| s.value_at(variable, phase))
        .collect()
}
