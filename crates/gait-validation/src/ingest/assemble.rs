//! Group rows by (subject, task, cycle) and build one stride per group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gait_core::constants::SAMPLES_PER_CYCLE;
use gait_core::errors::StructuralError;
use gait_core::types::{Stride, StrideId, Task, Variable};

use super::dataset::{DatasetRow, PhaseIndexedDataset};
use crate::spec::ValidationSpecification;

/// A (subject, task, cycle) group that could not become a stride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedGroup {
    pub subject: String,
    pub task: String,
    pub cycle: String,
    pub error: StructuralError,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Assembled strides, in sorted group-key order.
    pub strides: Vec<Stride>,
    pub rejected_groups: Vec<RejectedGroup>,
    /// Problems with the dataset as a whole. Any entry makes its structure invalid.
    pub dataset_issues: Vec<StructuralError>,
}

impl IngestReport {
    pub fn group_count(&self) -> usize {
        self.strides.len() + self.rejected_groups.len()
    }
}

/// Build strides from rows. Never fails as a whole: every problem is reported
/// either as a dataset issue or as a rejected group.
///
/// Columns with unknown names or a unit other than the variable's canonical
/// unit are reported and excluded; they are never converted.
pub fn assemble_strides(
    dataset: &PhaseIndexedDataset,
    spec: &ValidationSpecification,
) -> IngestReport {
    let mut report = IngestReport::default();

    if dataset.rows.is_empty() {
        report.dataset_issues.push(StructuralError::EmptyDataset);
        return report;
    }

    // (column index, variable) for every usable column.
    let mut usable: Vec<(usize, Variable)> = Vec::with_capacity(dataset.columns.len());
    for (idx, column) in dataset.columns.iter().enumerate() {
        let Ok(variable) = column.name.parse::<Variable>() else {
            report.dataset_issues.push(StructuralError::UnknownVariable {
                name: column.name.clone(),
            });
            continue;
        };
        let expected = variable.unit().symbol();
        if column.unit != expected {
            report.dataset_issues.push(StructuralError::UnitMismatch {
                column: column.name.clone(),
                declared: column.unit.clone(),
                expected: expected.to_string(),
            });
            continue;
        }
        usable.push((idx, variable));
    }

    let mut groups: BTreeMap<(&str, &str, &str), Vec<(usize, &DatasetRow)>> = BTreeMap::new();
    for (idx, row) in dataset.rows.iter().enumerate() {
        groups
            .entry((row.subject.as_str(), row.task.as_str(), row.cycle.as_str()))
            .or_default()
            .push((idx, row));
    }

    let mut present_tasks = Vec::new();
    for ((subject, task_label, cycle), mut rows) in groups {
        let reject = |error| RejectedGroup {
            subject: subject.to_string(),
            task: task_label.to_string(),
            cycle: cycle.to_string(),
            error,
        };

        let task = match task_label.parse::<Task>() {
            Ok(task) => task,
            Err(error) => {
                report.rejected_groups.push(reject(error));
                continue;
            }
        };
        if !present_tasks.contains(&task) {
            present_tasks.push(task);
        }

        rows.sort_by(|a, b| a.1.phase_percent.total_cmp(&b.1.phase_percent));
        if let Err(error) = check_group(&rows, dataset.columns.len()) {
            report.rejected_groups.push(reject(error));
            continue;
        }

        let curves = usable
            .iter()
            .map(|&(col, variable)| {
                let curve: Vec<f64> = rows.iter().map(|(_, row)| row.values[col]).collect();
                (variable, curve)
            })
            .collect();
        report
            .strides
            .push(Stride::new(StrideId::new(subject, task, cycle), curves));
    }

    // Required variables of every present task must be among the usable columns.
    for task in present_tasks {
        let Some(required) = spec.required_variables(task) else {
            continue;
        };
        for variable in required {
            if !usable.iter().any(|(_, v)| v == variable) {
                report.dataset_issues.push(StructuralError::MissingVariable {
                    task: task.to_string(),
                    variable: variable.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        strides = report.strides.len(),
        rejected_groups = report.rejected_groups.len(),
        dataset_issues = report.dataset_issues.len(),
        "dataset assembled"
    );
    report
}

/// Shape checks on one group, whose rows are already sorted by phase.
fn check_group(rows: &[(usize, &DatasetRow)], width: usize) -> Result<(), StructuralError> {
    for &(idx, row) in rows {
        if row.values.len() != width {
            return Err(StructuralError::RowWidthMismatch {
                row: idx,
                expected: width,
                actual: row.values.len(),
            });
        }
        if !(0.0..=100.0).contains(&row.phase_percent) {
            return Err(StructuralError::InvalidPhase {
                phase: row.phase_percent.to_string(),
            });
        }
    }
    // Rows arrive sorted by phase, so a repeat is always adjacent.
    if let Some(pair) = rows
        .windows(2)
        .find(|pair| pair[0].1.phase_percent == pair[1].1.phase_percent)
    {
        return Err(StructuralError::DuplicatePhase {
            phase: pair[1].1.phase_percent.to_string(),
        });
    }
    if rows.len() != SAMPLES_PER_CYCLE {
        return Err(StructuralError::WrongPointCount {
            variable: "phase".to_string(),
            expected: SAMPLES_PER_CYCLE,
            actual: rows.len(),
        });
    }
    Ok(())
}
