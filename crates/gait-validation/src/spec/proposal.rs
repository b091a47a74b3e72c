//! Staged specification changes. A proposal is inert until
//! `SpecificationStore::apply_revision` commits it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use gait_core::errors::SpecificationError;
use gait_core::types::{Task, Variable};

use super::range::Range;
use super::revision::{RevisionSource, VersionId};
use super::specification::{RangeKey, ValidationSpecification};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RevisionChange {
    SetRange { key: RangeKey, range: Range },
    RemoveRange { key: RangeKey },
    /// Replace the required set of a task.
    RequireVariables {
        task: Task,
        variables: BTreeSet<Variable>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedRevision {
    pub base: VersionId,
    pub changes: Vec<RevisionChange>,
    pub rationale: String,
    pub source: RevisionSource,
}

impl ProposedRevision {
    /// Apply the changes to a copy of `base` and validate the result in full.
    pub fn materialize(
        &self,
        base: &ValidationSpecification,
    ) -> Result<ValidationSpecification, SpecificationError> {
        if self.changes.is_empty() {
            return Err(SpecificationError::EmptyProposal);
        }
        let mut spec = base.clone();
        for change in &self.changes {
            match change {
                RevisionChange::SetRange { key, range } => {
                    range.validate(&key.to_string())?;
                    if spec
                        .required_variables(key.task)
                        .is_some_and(|r| !r.contains(&key.variable))
                    {
                        return Err(SpecificationError::VariableNotRequired {
                            task: key.task.to_string(),
                            variable: key.variable.to_string(),
                        });
                    }
                    spec.set_range(*key, range.clone());
                }
                RevisionChange::RemoveRange { key } => {
                    if spec.remove_range(key).is_none() {
                        return Err(SpecificationError::NotFound {
                            task: key.task.to_string(),
                            variable: key.variable.to_string(),
                            phase: key.phase.percent(),
                            version: self.base.get(),
                        });
                    }
                }
                RevisionChange::RequireVariables { task, variables } => {
                    spec.replace_required(*task, variables.clone());
                }
            }
        }
        spec.validate()?;
        Ok(spec)
    }
}

/// Accumulates changes against a base version.
#[derive(Debug, Clone)]
pub struct ProposalBuilder {
    base: VersionId,
    changes: Vec<RevisionChange>,
    rationale: String,
    source: RevisionSource,
}

impl ProposalBuilder {
    /// Start an empty proposal against `base`. The source defaults to a
    /// manual edit by an unknown author.
    pub fn new(base: VersionId) -> Self {
        Self {
            base,
            changes: Vec::new(),
            rationale: String::new(),
            source: RevisionSource::Manual {
                author: String::from("unknown"),
            },
        }
    }

    /// Insert or replace the range at `key`.
    pub fn set_range(mut self, key: RangeKey, range: Range) -> Self {
        self.changes.push(RevisionChange::SetRange { key, range });
        self
    }

    /// Drop the range at `key`. Fails at apply time if it is absent.
    pub fn remove_range(mut self, key: RangeKey) -> Self {
        self.changes.push(RevisionChange::RemoveRange { key });
        self
    }

    pub fn require_variables(mut self, task: Task, variables: BTreeSet<Variable>) -> Self {
        self.changes
            .push(RevisionChange::RequireVariables { task, variables });
        self
    }

    pub fn rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    pub fn source(mut self, source: RevisionSource) -> Self {
        self.source = source;
        self
    }

    /// Non-consuming variant for building proposals in a loop.
    pub fn push(&mut self, change: RevisionChange) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Finish the proposal. Nothing is validated until it is applied.
    pub fn build(self) -> ProposedRevision {
        ProposedRevision {
            base: self.base,
            changes: self.changes,
            rationale: self.rationale,
            source: self.source,
        }
    }
}
