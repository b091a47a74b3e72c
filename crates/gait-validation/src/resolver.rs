//! Exact-match range lookup against a pinned specification revision.
//!
//! There is no fallback: a lookup either yields the stored range or an
//! explicit reason why none exists. What to do about a miss is the
//! classifier's policy, not the resolver's.

use std::fmt;

use serde::{Deserialize, Serialize};

use gait_core::types::{Phase, Task, Variable};

use crate::spec::{Range, RangeKey, SpecRevision};

/// Why a lookup produced no range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// A string task label outside the task enumeration.
    UnknownTaskLabel,
    /// A string variable label outside the variable enumeration.
    UnknownVariableLabel,
    /// A string phase label that is not an integer percentage.
    UnknownPhaseLabel,
    /// The revision has no entry for the task.
    TaskNotSpecified,
    /// The task exists but does not require the variable.
    VariableNotRequired,
    /// The variable is required but has no range at this phase.
    PhaseNotSpecified,
    /// The requested version was never recorded.
    UnknownVersion,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownTaskLabel => "unknown_task_label",
            Self::UnknownVariableLabel => "unknown_variable_label",
            Self::UnknownPhaseLabel => "unknown_phase_label",
            Self::TaskNotSpecified => "task_not_specified",
            Self::VariableNotRequired => "variable_not_required",
            Self::PhaseNotSpecified => "phase_not_specified",
            Self::UnknownVersion => "unknown_version",
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one lookup. Borrows from the pinned revision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeLookup<'a> {
    Found(&'a Range),
    NotFound(NotFoundReason),
}

impl<'a> RangeLookup<'a> {
    pub fn found(&self) -> Option<&'a Range> {
        match self {
            Self::Found(range) => Some(range),
            Self::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_result(self) -> Result<&'a Range, NotFoundReason> {
        match self {
            Self::Found(range) => Ok(range),
            Self::NotFound(reason) => Err(reason),
        }
    }
}

/// Lookups against one revision. Cheap to construct; holds a reference only.
#[derive(Debug, Clone, Copy)]
pub struct RangeResolver<'a> {
    revision: &'a SpecRevision,
}

impl<'a> RangeResolver<'a> {
    pub fn new(revision: &'a SpecRevision) -> Self {
        Self { revision }
    }

    pub fn revision(&self) -> &'a SpecRevision {
        self.revision
    }

    pub fn resolve(&self, task: Task, variable: Variable, phase: Phase) -> RangeLookup<'a> {
        let spec = &self.revision.specification;
        let Some(task_spec) = spec.task(task) else {
            return RangeLookup::NotFound(NotFoundReason::TaskNotSpecified);
        };
        if !task_spec.required.contains(&variable) {
            return RangeLookup::NotFound(NotFoundReason::VariableNotRequired);
        }
        match spec.range(&RangeKey::new(task, variable, phase)) {
            Some(range) => RangeLookup::Found(range),
            None => RangeLookup::NotFound(NotFoundReason::PhaseNotSpecified),
        }
    }

    /// Lookup by external labels, as they appear in datasets and spec files.
    pub fn resolve_labels(&self, task: &str, variable: &str, phase: &str) -> RangeLookup<'a> {
        let Ok(task) = task.parse::<Task>() else {
            return RangeLookup::NotFound(NotFoundReason::UnknownTaskLabel);
        };
        let Ok(variable) = variable.parse::<Variable>() else {
            return RangeLookup::NotFound(NotFoundReason::UnknownVariableLabel);
        };
        let Ok(phase) = phase.parse::<Phase>() else {
            return RangeLookup::NotFound(NotFoundReason::UnknownPhaseLabel);
        };
        self.resolve(task, variable, phase)
    }
}
