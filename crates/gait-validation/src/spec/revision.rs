//! Immutable specification revisions and diffs between them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gait_core::types::{Task, Variable};

use super::range::Range;
use super::specification::{RangeKey, ValidationSpecification};

/// Monotonic revision id, starting at 1 for the initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(pub u32);

impl VersionId {
    pub const INITIAL: VersionId = VersionId(1);

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Where a revision came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RevisionSource {
    Initial,
    Manual { author: String },
    Tuned { method: String },
}

/// Before/after of one range. `None` on one side means added or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDelta {
    pub key: RangeKey,
    pub before: Option<Range>,
    pub after: Option<Range>,
}

/// A variable that became required (`required = true`) or stopped being required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDelta {
    pub task: Task,
    pub variable: Variable,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecDiff {
    pub ranges: Vec<RangeDelta>,
    pub requirements: Vec<RequirementDelta>,
}

impl SpecDiff {
    /// Compare two specifications. Output is ordered by key.
    pub fn between(before: &ValidationSpecification, after: &ValidationSpecification) -> Self {
        let mut diff = SpecDiff::default();

        for (key, old) in before.ranges() {
            match after.range(&key) {
                Some(new) if new == old => {}
                new => diff.ranges.push(RangeDelta {
                    key,
                    before: Some(old.clone()),
                    after: new.cloned(),
                }),
            }
        }
        for (key, new) in after.ranges() {
            if before.range(&key).is_none() {
                diff.ranges.push(RangeDelta {
                    key,
                    before: None,
                    after: Some(new.clone()),
                });
            }
        }
        diff.ranges.sort_by(|a, b| a.key.cmp(&b.key));

        for task in Task::ALL {
            let old = before.required_variables(task);
            let new = after.required_variables(task);
            for variable in Variable::ALL {
                let was = old.is_some_and(|s| s.contains(&variable));
                let is = new.is_some_and(|s| s.contains(&variable));
                if was != is {
                    diff.requirements.push(RequirementDelta {
                        task,
                        variable,
                        required: is,
                    });
                }
            }
        }

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.requirements.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.ranges.len() + self.requirements.len()
    }

    pub fn added(&self) -> impl Iterator<Item = &RangeDelta> {
        self.ranges.iter().filter(|d| d.before.is_none())
    }

    pub fn removed(&self) -> impl Iterator<Item = &RangeDelta> {
        self.ranges.iter().filter(|d| d.after.is_none())
    }

    pub fn changed(&self) -> impl Iterator<Item = &RangeDelta> {
        self.ranges
            .iter()
            .filter(|d| d.before.is_some() && d.after.is_some())
    }
}

/// One immutable snapshot of the specification.
#[derive(Debug, Clone)]
pub struct SpecRevision {
    pub version: VersionId,
    pub parent: Option<VersionId>,
    pub specification: Arc<ValidationSpecification>,
    pub diff: SpecDiff,
    pub rationale: String,
    pub source: RevisionSource,
    pub created_at: DateTime<Utc>,
    pub fingerprint: u64,
}

impl SpecRevision {
    pub(crate) fn new(
        version: VersionId,
        parent: Option<VersionId>,
        specification: ValidationSpecification,
        diff: SpecDiff,
        rationale: String,
        source: RevisionSource,
    ) -> Self {
        let fingerprint = specification.fingerprint();
        Self {
            version,
            parent,
            specification: Arc::new(specification),
            diff,
            rationale,
            source,
            created_at: Utc::now(),
            fingerprint,
        }
    }
}
