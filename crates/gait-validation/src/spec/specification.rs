//! The immutable `(task, variable, phase) → Range` mapping.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use gait_core::errors::SpecificationError;
use gait_core::types::{Phase, Task, Variable};

use super::range::Range;

/// Persisted shape: `task → variable → phase → range`.
/// A variable with an empty phase map is required but has no ranges.
pub type NestedSpecification = BTreeMap<String, BTreeMap<String, BTreeMap<String, Range>>>;

/// Lookup key for one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RangeKey {
    pub task: Task,
    pub variable: Variable,
    pub phase: Phase,
}

impl RangeKey {
    pub fn new(task: Task, variable: Variable, phase: Phase) -> Self {
        Self {
            task,
            variable,
            phase,
        }
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.task, self.variable, self.phase)
    }
}

/// Per-task portion of a specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskSpecification {
    pub required: BTreeSet<Variable>,
    pub ranges: BTreeMap<(Variable, Phase), Range>,
}

/// Full specification. Cheap to share behind an `Arc` inside a revision.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "NestedSpecification", try_from = "NestedSpecification")]
pub struct ValidationSpecification {
    tasks: BTreeMap<Task, TaskSpecification>,
}

impl ValidationSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `variable` as required for `task`.
    pub fn require(&mut self, task: Task, variable: Variable) -> &mut Self {
        self.tasks.entry(task).or_default().required.insert(variable);
        self
    }

    /// Insert a range, requiring its variable for the task.
    pub fn set_range(&mut self, key: RangeKey, range: Range) -> &mut Self {
        let spec = self.tasks.entry(key.task).or_default();
        spec.required.insert(key.variable);
        spec.ranges.insert((key.variable, key.phase), range);
        self
    }

    pub fn remove_range(&mut self, key: &RangeKey) -> Option<Range> {
        self.tasks
            .get_mut(&key.task)
            .and_then(|s| s.ranges.remove(&(key.variable, key.phase)))
    }

    /// Replace the required set of a task. Ranges of variables that are no
    /// longer required are dropped.
    pub fn replace_required(&mut self, task: Task, variables: BTreeSet<Variable>) {
        let spec = self.tasks.entry(task).or_default();
        spec.ranges.retain(|(v, _), _| variables.contains(v));
        spec.required = variables;
    }

    pub fn task(&self, task: Task) -> Option<&TaskSpecification> {
        self.tasks.get(&task)
    }

    pub fn tasks(&self) -> impl Iterator<Item = (Task, &TaskSpecification)> {
        self.tasks.iter().map(|(t, s)| (*t, s))
    }

    pub fn range(&self, key: &RangeKey) -> Option<&Range> {
        self.tasks
            .get(&key.task)
            .and_then(|s| s.ranges.get(&(key.variable, key.phase)))
    }

    pub fn required_variables(&self, task: Task) -> Option<&BTreeSet<Variable>> {
        self.tasks.get(&task).map(|s| &s.required)
    }

    /// All ranges in key order.
    pub fn ranges(&self) -> impl Iterator<Item = (RangeKey, &Range)> {
        self.tasks.iter().flat_map(|(task, spec)| {
            spec.ranges
                .iter()
                .map(move |((variable, phase), range)| (RangeKey::new(*task, *variable, *phase), range))
        })
    }

    pub fn range_count(&self) -> usize {
        self.tasks.values().map(|s| s.ranges.len()).sum()
    }

    /// Check every range and that ranged variables are required.
    pub fn validate(&self) -> Result<(), SpecificationError> {
        for (task, spec) in &self.tasks {
            for ((variable, phase), range) in &spec.ranges {
                if !spec.required.contains(variable) {
                    return Err(SpecificationError::VariableNotRequired {
                        task: task.to_string(),
                        variable: variable.to_string(),
                    });
                }
                range.validate(&RangeKey::new(*task, *variable, *phase).to_string())?;
            }
        }
        Ok(())
    }

    pub fn to_nested(&self) -> NestedSpecification {
        let mut nested = NestedSpecification::new();
        for (task, spec) in &self.tasks {
            let variables = nested.entry(task.as_str().to_string()).or_default();
            for variable in &spec.required {
                variables.entry(variable.as_str().to_string()).or_default();
            }
            for ((variable, phase), range) in &spec.ranges {
                variables
                    .entry(variable.as_str().to_string())
                    .or_default()
                    .insert(phase.percent().to_string(), range.clone());
            }
        }
        nested
    }

    /// Build from the persisted shape, rejecting unknown labels and invalid ranges.
    pub fn from_nested(nested: &NestedSpecification) -> Result<Self, SpecificationError> {
        let mut spec = Self::new();
        for (task_label, variables) in nested {
            let task = Task::from_label(task_label).ok_or_else(|| SpecificationError::UnknownTask {
                label: task_label.clone(),
            })?;
            spec.tasks.entry(task).or_default();
            for (variable_label, phases) in variables {
                let variable = Variable::from_label(variable_label).ok_or_else(|| {
                    SpecificationError::UnknownVariable {
                        label: variable_label.clone(),
                    }
                })?;
                spec.require(task, variable);
                for (phase_label, range) in phases {
                    let phase = phase_label.parse::<Phase>().map_err(|_| {
                        SpecificationError::UnknownPhase {
                            label: phase_label.clone(),
                        }
                    })?;
                    spec.set_range(RangeKey::new(task, variable, phase), range.clone());
                }
            }
        }
        spec.validate()?;
        Ok(spec)
    }

    /// Content fingerprint over the canonical nested serialization.
    pub fn fingerprint(&self) -> u64 {
        // BTreeMap ordering makes the JSON canonical.
        match serde_json::to_vec(&self.to_nested()) {
            Ok(bytes) => xxh3_64(&bytes),
            Err(_) => 0,
        }
    }
}

impl From<ValidationSpecification> for NestedSpecification {
    fn from(spec: ValidationSpecification) -> Self {
        spec.to_nested()
    }
}

impl TryFrom<NestedSpecification> for ValidationSpecification {
    type Error = SpecificationError;

    fn try_from(nested: NestedSpecification) -> Result<Self, Self::Error> {
        Self::from_nested(&nested)
    }
}
