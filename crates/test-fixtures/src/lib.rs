//! Shared builders for gait validation tests and benchmarks.
//!
//! Specifications here are synthetic but shaped like real sagittal-plane
//! ranges (radians for angles, N·m for moments, N for force).

use std::collections::BTreeMap;

use statrs::distribution::{ContinuousCDF, Normal};

use gait_core::constants::SAMPLES_PER_CYCLE;
use gait_core::types::{Phase, Stride, StrideId, Task, Variable};
use gait_validation::ingest::{ColumnDecl, DatasetRow, PhaseIndexedDataset};
use gait_validation::spec::{Range, RangeKey, ValidationSpecification};

/// `(variable, [(min, max); 4])` at phases 0, 25, 50, 75%.
type RangeTable = &'static [(Variable, [(f64, f64); 4])];

const LEVEL_WALKING: RangeTable = &[
    (Variable::HipFlexionAngle, [(0.35, 0.70), (0.00, 0.40), (-0.25, 0.15), (-0.30, 0.05)]),
    (Variable::KneeFlexionAngle, [(-0.10, 0.25), (0.05, 0.45), (0.0, 1.2), (0.70, 1.25)]),
    (Variable::AnkleDorsiflexionAngle, [(-0.20, 0.10), (0.00, 0.30), (0.05, 0.35), (-0.45, 0.00)]),
];

const RUN: RangeTable = &[
    (Variable::HipFlexionAngle, [(0.40, 0.90), (0.00, 0.50), (-0.30, 0.20), (0.10, 0.80)]),
    (Variable::KneeFlexionAngle, [(0.10, 0.60), (0.40, 1.00), (0.0, 1.2), (1.00, 1.90)]),
    (Variable::VerticalGroundReactionForce, [(0.0, 900.0), (800.0, 2200.0), (0.0, 400.0), (0.0, 100.0)]),
];

fn spec_from_table(spec: &mut ValidationSpecification, task: Task, table: RangeTable) {
    for (variable, bounds) in table {
        for (phase, (min, max)) in Phase::representative().into_iter().zip(bounds) {
            spec.set_range(
                RangeKey::new(task, *variable, phase),
                Range::new(*min, *max, format!("synthetic {task} {variable} at {phase}")),
            );
        }
    }
}

/// Level walking only; `knee_flexion_angle` at 50% is `[0.0, 1.2]`.
pub fn level_walking_spec() -> ValidationSpecification {
    let mut spec = ValidationSpecification::new();
    spec_from_table(&mut spec, Task::LevelWalking, LEVEL_WALKING);
    spec
}

/// Level walking plus running.
pub fn standard_spec() -> ValidationSpecification {
    let mut spec = level_walking_spec();
    spec_from_table(&mut spec, Task::Run, RUN);
    spec
}

/// A stride that passes every check of `spec`: each representative sample
/// is the midpoint of its range. Non-representative samples repeat the
/// preceding representative value.
pub fn stride_inside(
    spec: &ValidationSpecification,
    subject: &str,
    task: Task,
    cycle: &str,
) -> Stride {
    let mut curves = BTreeMap::new();
    if let Some(required) = spec.required_variables(task) {
        for &variable in required {
            let mut curve = vec![0.0; SAMPLES_PER_CYCLE];
            for phase in Phase::representative() {
                let value = spec
                    .range(&RangeKey::new(task, variable, phase))
                    .map_or(0.0, |r| (r.min + r.max) / 2.0);
                curve[phase.sample_index()..].fill(value);
            }
            curves.insert(variable, curve);
        }
    }
    Stride::new(StrideId::new(subject, task, cycle), curves)
}

/// Copy of `stride` with one sample replaced.
pub fn stride_with_value(stride: &Stride, variable: Variable, phase: Phase, value: f64) -> Stride {
    let mut out = stride.clone();
    if let Some(curve) = out.curves.get_mut(&variable) {
        curve[phase.sample_index()] = value;
    }
    out
}

/// Copy of `stride` with `variable` truncated to `len` samples.
pub fn stride_with_length(stride: &Stride, variable: Variable, len: usize) -> Stride {
    let mut out = stride.clone();
    if let Some(curve) = out.curves.get_mut(&variable) {
        curve.resize(len, 0.0);
    }
    out
}

/// Copy of `stride` without `variable`.
pub fn stride_without(stride: &Stride, variable: Variable) -> Stride {
    let mut out = stride.clone();
    out.curves.remove(&variable);
    out
}

pub fn phase(percent: u8) -> Phase {
    Phase::new(percent).expect("phase percent within 0..=100")
}

/// `valid` passing strides followed by `invalid` strides with knee flexion at
/// 50% set to 1.5 rad, all for level walking against `level_walking_spec`.
pub fn mixed_batch(valid: usize, invalid: usize) -> Vec<Stride> {
    let spec = level_walking_spec();
    let mut strides = Vec::with_capacity(valid + invalid);
    for i in 0..valid {
        strides.push(stride_inside(&spec, &format!("S{:03}", i % 10), Task::LevelWalking, &format!("ok{i}")));
    }
    for i in 0..invalid {
        let base = stride_inside(&spec, &format!("S{:03}", i % 10), Task::LevelWalking, &format!("bad{i}"));
        strides.push(stride_with_value(&base, Variable::KneeFlexionAngle, phase(50), 1.5));
    }
    strides
}

/// Deterministic quasi-sample of N(mean, sd): the normal quantiles at
/// `(i + 0.5) / n`.
pub fn normal_samples(n: usize, mean: f64, sd: f64) -> Vec<f64> {
    let normal = Normal::new(mean, sd).expect("valid normal parameters");
    (0..n)
        .map(|i| normal.inverse_cdf((i as f64 + 0.5) / n as f64))
        .collect()
}

/// Strides of `task` whose `variable` at every representative phase follows
/// `normal_samples(n, mean, sd)`; other required variables sit mid-range.
pub fn normal_strides(
    spec: &ValidationSpecification,
    task: Task,
    variable: Variable,
    n: usize,
    mean: f64,
    sd: f64,
) -> Vec<Stride> {
    normal_samples(n, mean, sd)
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let mut stride = stride_inside(spec, &format!("S{:03}", i % 20), task, &format!("c{i}"));
            stride
                .curves
                .entry(variable)
                .or_insert_with(|| vec![0.0; SAMPLES_PER_CYCLE]);
            for p in Phase::representative() {
                stride = stride_with_value(&stride, variable, p, value);
            }
            stride
        })
        .collect()
}

/// Row-oriented form of `strides`: one row per sample, columns in variable
/// order with canonical units.
pub fn dataset_from_strides(strides: &[Stride]) -> PhaseIndexedDataset {
    let variables: Vec<Variable> = Variable::ALL
        .into_iter()
        .filter(|v| strides.iter().any(|s| s.curves.contains_key(v)))
        .collect();
    let columns = variables
        .iter()
        .map(|v| ColumnDecl::new(v.as_str(), v.unit().symbol()))
        .collect();
    let mut dataset = PhaseIndexedDataset::new(columns);
    for stride in strides {
        for i in 0..SAMPLES_PER_CYCLE {
            dataset.push_row(DatasetRow {
                subject: stride.id.subject.clone(),
                task: stride.id.task.as_str().to_string(),
                cycle: stride.id.cycle.clone(),
                phase_percent: i as f64 * 100.0 / SAMPLES_PER_CYCLE as f64,
                values: variables
                    .iter()
                    .map(|v| stride.curve(*v).and_then(|c| c.get(i)).copied().unwrap_or(0.0))
                    .collect(),
            });
        }
    }
    dataset
}
