//! SpecificationTuner: range derivation, staged proposals, impact analysis.

use std::sync::Arc;

use gait_core::config::{GaitConfig, TunerConfig};
use gait_core::errors::TuningError;
use gait_core::types::{Task, Variable};
use gait_validation::audit::AuditLog;
use gait_validation::batch::BatchValidationEngine;
use gait_validation::spec::{
    CriticalPredicate, ProposalBuilder, Range, RangeKey, RevisionChange, RevisionSource,
    SpecificationStore, VersionId,
};
use gait_validation::tuning::{impact_analysis, SpecificationTuner, TuningMethod};
use gait_core::types::Stride;
use test_fixtures::{
    level_walking_spec, mixed_batch, normal_samples, normal_strides, phase, stride_with_length,
};

const TOL: f64 = 0.005;

#[test]
fn symmetric_percentile_matches_normal_quantiles() {
    let tuner = SpecificationTuner::default();
    let samples = normal_samples(1000, 0.5, 0.1);
    let range = tuner
        .propose(
            Task::LevelWalking,
            Variable::KneeFlexionAngle,
            phase(50),
            &samples,
            TuningMethod::SymmetricPercentile { coverage: 0.95 },
        )
        .unwrap();
    assert!((range.min - (0.5 - 1.96 * 0.1)).abs() < TOL, "min {}", range.min);
    assert!((range.max - (0.5 + 1.96 * 0.1)).abs() < TOL, "max {}", range.max);
    assert!(!range.rationale.is_empty());
}

#[test]
fn mean_std_and_tukey_bounds() {
    let tuner = SpecificationTuner::default();
    let samples = normal_samples(1000, 0.5, 0.1);
    let key = (Task::Run, Variable::HipFlexionAngle, phase(25));

    let ms = tuner
        .propose(key.0, key.1, key.2, &samples, TuningMethod::MeanStd { k: 1.96 })
        .unwrap();
    assert!((ms.min - 0.304).abs() < 0.01);
    assert!((ms.max - 0.696).abs() < 0.01);

    // Normal IQR is 1.349 sd; fences at 1.5 IQR sit near ±2.698 sd.
    let tukey = tuner
        .propose(key.0, key.1, key.2, &samples, TuningMethod::Tukey { k: 1.5 })
        .unwrap();
    assert!((tukey.min - (0.5 - 0.2698)).abs() < 0.01, "min {}", tukey.min);
    assert!((tukey.max - (0.5 + 0.2698)).abs() < 0.01, "max {}", tukey.max);
}

#[test]
fn non_finite_samples_are_dropped_before_counting() {
    let tuner = SpecificationTuner::new(&TunerConfig {
        min_samples: Some(10),
        ..Default::default()
    });
    let mut samples = normal_samples(5, 0.0, 1.0);
    samples.extend([f64::NAN, f64::INFINITY, f64::NAN, f64::NAN, f64::NEG_INFINITY]);
    let err = tuner
        .propose(
            Task::Run,
            Variable::KneeFlexionAngle,
            phase(0),
            &samples,
            TuningMethod::MeanStd { k: 2.0 },
        )
        .unwrap_err();
    assert_eq!(
        err,
        TuningError::InsufficientSamples {
            available: 5,
            required: 10
        }
    );
}

#[test]
fn constant_samples_give_degenerate_range() {
    let tuner = SpecificationTuner::default();
    let err = tuner
        .propose(
            Task::Run,
            Variable::KneeFlexionAngle,
            phase(0),
            &[0.4; 30],
            TuningMethod::SymmetricPercentile { coverage: 0.9 },
        )
        .unwrap_err();
    assert!(matches!(err, TuningError::DegenerateRange { .. }));

    let err = tuner
        .propose(
            Task::Run,
            Variable::KneeFlexionAngle,
            phase(0),
            &[0.4; 30],
            TuningMethod::SymmetricPercentile { coverage: 1.5 },
        )
        .unwrap_err();
    assert!(matches!(err, TuningError::InvalidParameter { .. }));
}

#[test]
fn samples_from_strides_filters_by_task() {
    let spec = level_walking_spec();
    let mut strides = normal_strides(&spec, Task::LevelWalking, Variable::KneeFlexionAngle, 30, 0.5, 0.1);
    let mut other = strides[0].clone();
    other.id.task = Task::Run;
    strides.push(other);

    let samples = SpecificationTuner::samples_from_strides(
        &strides,
        Task::LevelWalking,
        Variable::KneeFlexionAngle,
        phase(50),
    );
    assert_eq!(samples.len(), 30);
}

/// A stride whose knee curve is cut to 40 points, with an outlier at 25%.
fn truncated_knee_outlier(base: &Stride) -> Stride {
    let mut stride = stride_with_length(base, Variable::KneeFlexionAngle, 40);
    let curve = stride.curves.get_mut(&Variable::KneeFlexionAngle).unwrap();
    curve[phase(25).sample_index()] = 99.0;
    stride
}

#[test]
fn samples_from_strides_skips_wrong_length_curves() {
    let spec = level_walking_spec();
    let mut strides = normal_strides(&spec, Task::LevelWalking, Variable::KneeFlexionAngle, 12, 0.5, 0.1);
    strides.push(truncated_knee_outlier(&strides[0]));

    let samples = SpecificationTuner::samples_from_strides(
        &strides,
        Task::LevelWalking,
        Variable::KneeFlexionAngle,
        phase(25),
    );
    assert_eq!(samples.len(), 12);
    assert!(!samples.contains(&99.0));
}

#[test]
fn tune_task_excludes_malformed_strides() {
    let store = SpecificationStore::new(level_walking_spec(), "initial").unwrap();
    let revision = store.pin();
    let mut strides = normal_strides(
        &revision.specification,
        Task::LevelWalking,
        Variable::KneeFlexionAngle,
        200,
        0.5,
        0.1,
    );
    for i in 0..5 {
        let malformed = truncated_knee_outlier(&strides[i]);
        strides.push(malformed);
    }
    // A stride missing a required variable is excluded too.
    let mut missing_hip = strides[0].clone();
    missing_hip.curves.remove(&Variable::HipFlexionAngle);
    strides.push(missing_hip);

    let outcome = SpecificationTuner::default()
        .tune_task(
            &revision,
            Task::LevelWalking,
            &strides,
            TuningMethod::SymmetricPercentile { coverage: 0.95 },
        )
        .unwrap();

    assert_eq!(outcome.excluded_strides, 6);
    let knee25 = RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(25));
    let proposed = outcome
        .proposal
        .changes
        .iter()
        .find_map(|change| match change {
            RevisionChange::SetRange { key, range } if *key == knee25 => Some(range.clone()),
            _ => None,
        })
        .unwrap();
    assert!(proposed.max < 1.0, "outlier leaked into {proposed:?}");
}

#[test]
fn tune_task_stages_a_reviewable_proposal() {
    let mut spec = level_walking_spec();
    let knee50 = RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50));
    spec.set_range(
        knee50,
        Range::new(0.0, 1.2, "").with_critical(CriticalPredicate::OutsideLimits {
            lower: -1.0,
            upper: 3.0,
        }),
    );
    let store = SpecificationStore::new(spec, "initial").unwrap();
    let strides = normal_strides(
        &store.pin().specification,
        Task::LevelWalking,
        Variable::KneeFlexionAngle,
        500,
        0.5,
        0.1,
    );

    let tuner = SpecificationTuner::default();
    let outcome = tuner
        .tune_task(
            &store.pin(),
            Task::LevelWalking,
            &strides,
            TuningMethod::SymmetricPercentile { coverage: 0.95 },
        )
        .unwrap();

    // Knee varies; hip and ankle are constant and cannot be tuned.
    assert_eq!(outcome.proposal.changes.len(), 4);
    assert_eq!(outcome.skipped.len(), 8);
    assert!(outcome
        .skipped
        .iter()
        .all(|s| matches!(s.error, TuningError::DegenerateRange { .. })));
    assert_eq!(
        outcome.proposal.source,
        RevisionSource::Tuned {
            method: "symmetric_percentile".into()
        }
    );

    // Tuning never touches the store.
    assert_eq!(store.history().len(), 1);

    let v2 = store.apply_revision(&outcome.proposal).unwrap();
    let tuned = store
        .get_range(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50), v2)
        .unwrap();
    assert!((tuned.min - 0.304).abs() < 0.01);
    assert!((tuned.max - 0.696).abs() < 0.01);
    assert!(tuned.critical.is_some());
}

#[test]
fn impact_analysis_reports_flips_without_committing() {
    let audit = Arc::new(AuditLog::new());
    let store = Arc::new(SpecificationStore::new(level_walking_spec(), "initial").unwrap());
    let engine = BatchValidationEngine::new(Arc::clone(&store), &GaitConfig::default())
        .with_audit(Arc::clone(&audit));
    let reference = mixed_batch(80, 20);

    let knee50 = RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50));
    let proposal = ProposalBuilder::new(VersionId::INITIAL)
        .set_range(knee50, Range::new(0.0, 1.6, "widen"))
        .build();
    let report = impact_analysis(&engine, &proposal, &reference).unwrap();

    assert!((report.base_pass_rate - 0.8).abs() < 1e-9);
    assert!((report.candidate_pass_rate - 1.0).abs() < 1e-9);
    assert!((report.pass_rate_delta - 0.2).abs() < 1e-9);
    assert_eq!(report.newly_accepted.len(), 20);
    assert!(report.newly_rejected.is_empty());
    assert_eq!(report.diff.changed().count(), 1);

    let check = report.per_check.iter().find(|d| d.key == knee50).unwrap();
    assert!((check.delta.unwrap() - 0.2).abs() < 1e-9);

    assert_eq!(store.current_version(), VersionId::INITIAL);
    assert_eq!(store.history().len(), 1);
    assert!(audit.is_empty());
}
