//! One gait cycle of one subject performing one task.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Phase, Task, Variable};

/// Identity of a stride: (subject, task, cycle id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrideId {
    pub subject: String,
    pub task: Task,
    pub cycle: String,
}

impl StrideId {
    pub fn new(subject: impl Into<String>, task: Task, cycle: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            task,
            cycle: cycle.into(),
        }
    }
}

impl fmt::Display for StrideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.subject, self.task, self.cycle)
    }
}

/// Phase-indexed curves for one stride, one per variable.
///
/// Construction does not check shape; the classifier does, so that a
/// malformed stride surfaces as a structural failure of that stride only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stride {
    pub id: StrideId,
    pub curves: BTreeMap<Variable, Vec<f64>>,
}

impl Stride {
    pub fn new(id: StrideId, curves: BTreeMap<Variable, Vec<f64>>) -> Self {
        Self { id, curves }
    }

    pub fn task(&self) -> Task {
        self.id.task
    }

    pub fn curve(&self, variable: Variable) -> Option<&[f64]> {
        self.curves.get(&variable).map(Vec::as_slice)
    }

    /// Sample of `variable` at `phase`, if the curve is long enough.
    pub fn value_at(&self, variable: Variable, phase: Phase) -> Option<f64> {
        self.curves
            .get(&variable)
            .and_then(|c| c.get(phase.sample_index()))
            .copied()
    }

    /// Approximate heap footprint, used for batch memory estimates.
    pub fn approx_bytes(&self) -> u64 {
        let samples: usize = self.curves.values().map(Vec::len).sum();
        (samples * std::mem::size_of::<f64>()
            + self.id.subject.len()
            + self.id.cycle.len()
            + std::mem::size_of::<Self>()) as u64
    }
}
