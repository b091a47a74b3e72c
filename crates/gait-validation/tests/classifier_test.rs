//! StrideClassifier: verdicts, severities, structure checks, missing-range policy.

use gait_core::config::MissingRangePolicy;
use gait_core::errors::StructuralError;
use gait_core::types::{Task, Variable};
use gait_validation::classify::{Severity, StrideClassifier, ViolationKind};
use gait_validation::spec::{
    CriticalPredicate, Range, RangeKey, SpecRevision, SpecificationStore, ValidationSpecification,
};
use std::sync::Arc;
use test_fixtures::{
    level_walking_spec, phase, stride_inside, stride_with_length, stride_with_value,
    stride_without,
};

fn pinned(spec: ValidationSpecification) -> Arc<SpecRevision> {
    SpecificationStore::new(spec, "test").unwrap().pin()
}

#[test]
fn stride_inside_all_ranges_is_valid() {
    let rev = pinned(level_walking_spec());
    let stride = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let verdict = StrideClassifier::default().classify(&stride, &rev).unwrap();
    assert!(verdict.valid);
    assert!(verdict.violations.is_empty());
    assert_eq!(verdict.checks.len(), 12);
    assert!(verdict.checks.iter().all(|c| c.passed));
    assert!(verdict.skipped.is_empty());
}

#[test]
fn single_out_of_range_value_yields_one_violation() {
    let rev = pinned(level_walking_spec());
    let base = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let stride = stride_with_value(&base, Variable::KneeFlexionAngle, phase(50), 1.5);

    let verdict = StrideClassifier::default().classify(&stride, &rev).unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.violations.len(), 1);
    let v = &verdict.violations[0];
    assert_eq!(v.variable, Variable::KneeFlexionAngle);
    assert_eq!(v.phase, phase(50));
    assert_eq!(v.observed, Some(1.5));
    assert_eq!(v.kind, ViolationKind::AboveMax);
    assert_eq!(v.severity, Severity::Major);
    assert_eq!(v.spec_version, rev.version);
    let range = v.range.as_ref().unwrap();
    assert_eq!((range.min, range.max), (0.0, 1.2));
}

#[test]
fn bounds_are_inclusive() {
    let rev = pinned(level_walking_spec());
    let base = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let classifier = StrideClassifier::default();
    for value in [0.0, 1.2] {
        let stride = stride_with_value(&base, Variable::KneeFlexionAngle, phase(50), value);
        assert!(classifier.classify(&stride, &rev).unwrap().valid, "value {value}");
    }
    let just_over = stride_with_value(&base, Variable::KneeFlexionAngle, phase(50), 1.2 + 1e-9);
    let verdict = classifier.classify(&just_over, &rev).unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.violations[0].severity, Severity::Minor);
}

#[test]
fn only_representative_phases_are_read() {
    let rev = pinned(level_walking_spec());
    let mut stride = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    // Index 76 sits between the 50% (75) and 75% (112) samples.
    stride.curves.get_mut(&Variable::KneeFlexionAngle).unwrap()[76] = 99.0;
    assert!(StrideClassifier::default().classify(&stride, &rev).unwrap().valid);
}

#[test]
fn wrong_point_count_is_structural() {
    let rev = pinned(level_walking_spec());
    let base = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let stride = stride_with_length(&base, Variable::HipFlexionAngle, 149);
    let err = StrideClassifier::default().classify(&stride, &rev).unwrap_err();
    assert_eq!(
        err,
        StructuralError::WrongPointCount {
            variable: "hip_flexion_angle".into(),
            expected: 150,
            actual: 149,
        }
    );
}

#[test]
fn missing_required_variable_fails_whole_stride() {
    let rev = pinned(level_walking_spec());
    let base = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let stride = stride_without(&base, Variable::AnkleDorsiflexionAngle);
    let err = StrideClassifier::default().classify(&stride, &rev).unwrap_err();
    assert!(matches!(err, StructuralError::MissingVariable { .. }));
}

#[test]
fn extra_variables_are_ignored() {
    let rev = pinned(level_walking_spec());
    let mut stride = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    stride.curves.insert(Variable::PelvisTiltAngle, vec![f64::NAN; 10]);
    let verdict = StrideClassifier::default().classify(&stride, &rev).unwrap();
    assert!(verdict.valid);
    assert_eq!(verdict.checks.len(), 12);
}

#[test]
fn non_finite_value_is_critical() {
    let rev = pinned(level_walking_spec());
    let base = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let stride = stride_with_value(&base, Variable::HipFlexionAngle, phase(25), f64::NAN);
    let verdict = StrideClassifier::default().classify(&stride, &rev).unwrap();
    assert_eq!(verdict.violations.len(), 1);
    assert_eq!(verdict.violations[0].kind, ViolationKind::NonFinite);
    assert_eq!(verdict.violations[0].severity, Severity::Critical);
    assert_eq!(verdict.violations[0].observed, None);
}

#[test]
fn critical_predicate_from_specification() {
    let mut spec = level_walking_spec();
    let key = RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50));
    spec.set_range(
        key,
        Range::new(0.0, 1.2, "").with_critical(CriticalPredicate::OppositeSign),
    );
    let rev = pinned(spec);
    let base = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let stride = stride_with_value(&base, Variable::KneeFlexionAngle, phase(50), -0.05);
    let verdict = StrideClassifier::default().classify(&stride, &rev).unwrap();
    assert_eq!(verdict.violations[0].kind, ViolationKind::BelowMin);
    assert_eq!(verdict.violations[0].severity, Severity::Critical);
}

#[test]
fn missing_range_policy() {
    let mut spec = level_walking_spec();
    let hip75 = RangeKey::new(Task::LevelWalking, Variable::HipFlexionAngle, phase(75));
    spec.remove_range(&hip75);
    let rev = pinned(spec);
    let stride = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");

    let skip = StrideClassifier::new(MissingRangePolicy::Skip, 0.1);
    let verdict = skip.classify(&stride, &rev).unwrap();
    assert!(verdict.valid);
    assert_eq!(verdict.skipped, vec![(Variable::HipFlexionAngle, phase(75))]);
    assert_eq!(verdict.checks.len(), 11);

    let closed = StrideClassifier::new(MissingRangePolicy::FailClosed, 0.1);
    let verdict = closed.classify(&stride, &rev).unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.violations.len(), 1);
    assert_eq!(verdict.violations[0].kind, ViolationKind::MissingRange);
    assert_eq!(verdict.violations[0].severity, Severity::Major);
    assert!(verdict.violations[0].range.is_none());
}

#[test]
fn unspecified_task_is_skipped_not_defaulted() {
    let rev = pinned(level_walking_spec());
    let walking = stride_inside(&rev.specification, "S001", Task::LevelWalking, "1");
    let mut stride = walking.clone();
    stride.id.task = Task::StairAscent;

    let verdict = StrideClassifier::default().classify(&stride, &rev).unwrap();
    assert!(verdict.valid);
    assert!(verdict.checks.is_empty());
    assert_eq!(verdict.skipped.len(), 12);
}
