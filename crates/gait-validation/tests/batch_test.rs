//! BatchValidationEngine: aggregation, dataset verdict, determinism, budgets.

use std::sync::{Arc, Mutex};

use gait_core::config::GaitConfig;
use gait_core::errors::{ResourceError, StructuralError, ValidationError};
use gait_core::events::{BatchStartedEvent, EventDispatcher, GaitEventHandler};
use gait_core::traits::{Cancellable, CancellationToken};
use gait_core::types::{Task, Variable};
use gait_validation::audit::{AuditEventKind, AuditLog, AuditQuery};
use gait_validation::batch::{BatchValidationEngine, RejectionReason};
use gait_validation::classify::ViolationKind;
use gait_validation::ingest::ColumnDecl;
use gait_validation::spec::{ProposalBuilder, Range, RangeKey, SpecificationStore, VersionId};
use test_fixtures::{
    dataset_from_strides, level_walking_spec, mixed_batch, phase, stride_inside,
    stride_with_length,
};

fn store() -> Arc<SpecificationStore> {
    Arc::new(SpecificationStore::new(level_walking_spec(), "initial").unwrap())
}

fn engine_with(store: Arc<SpecificationStore>, chunk_size: usize, threads: usize) -> BatchValidationEngine {
    let mut config = GaitConfig::default();
    config.batch.chunk_size = Some(chunk_size);
    config.batch.min_chunk_size = Some(1);
    config.batch.threads = Some(threads);
    BatchValidationEngine::new(store, &config)
}

#[test]
fn pass_rate_is_exact_fraction() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 16, 2);
    let strides = mixed_batch(85, 15);
    let result = engine.validate(&strides, store.current_version()).unwrap();

    assert_eq!(result.total_strides, 100);
    assert_eq!(result.valid_strides, 85);
    assert_eq!(result.invalid_strides, 15);
    assert_eq!(result.structural_failures, 0);
    assert!((result.pass_rate - 0.85).abs() < 1e-9);
    assert_eq!(result.rejections.len(), 15);
    assert!(result.structure.valid);
    assert!(result.validation_passed);

    // Decisions follow input order.
    assert!(result.decisions.iter().enumerate().all(|(i, d)| d.index == i));
    assert!(result.decisions[..85].iter().all(|d| d.keep));
    assert!(result.decisions[85..].iter().all(|d| !d.keep));

    let knee50 = RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50));
    let check = result.check_rate(&knee50).unwrap();
    assert_eq!((check.passed, check.total), (85, 100));

    let top = &result.top_rejection_reasons[0];
    assert_eq!(top.count, 15);
    assert_eq!(
        top.reason,
        RejectionReason::Range {
            kind: ViolationKind::AboveMax,
            task: Task::LevelWalking,
            variable: Variable::KneeFlexionAngle,
            phase: phase(50),
        }
    );
    assert_eq!(result.per_task[&Task::LevelWalking].passed, 85);
    assert_eq!(result.spec_fingerprint, store.pin().fingerprint);
}

#[test]
fn low_pass_rate_with_valid_structure_still_passes() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 32, 1);
    let result = engine.validate(&mixed_batch(1, 99), VersionId::INITIAL).unwrap();
    assert!((result.pass_rate - 0.01).abs() < 1e-9);
    assert!(result.structure.valid);
    assert!(result.validation_passed);
}

#[test]
fn zero_passing_with_valid_structure_passes() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 32, 1);
    let result = engine.validate(&mixed_batch(0, 20), VersionId::INITIAL).unwrap();
    assert_eq!(result.valid_strides, 0);
    assert!(result.structure.valid);
    assert!(result.validation_passed);
}

#[test]
fn zero_passing_with_invalid_structure_fails() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 32, 1);
    let strides: Vec<_> = mixed_batch(0, 10)
        .iter()
        .map(|s| stride_with_length(s, Variable::KneeFlexionAngle, 100))
        .collect();
    let result = engine.validate(&strides, VersionId::INITIAL).unwrap();
    assert_eq!(result.structural_failures, 10);
    assert_eq!(result.invalid_strides, 10);
    assert_eq!(result.structural.len(), 10);
    assert!((result.structure.structural_failure_fraction - 1.0).abs() < 1e-12);
    assert!(!result.structure.valid);
    assert!(!result.validation_passed);
    assert!(result.decisions.iter().all(|d| !d.keep));
}

#[test]
fn structural_failures_do_not_abort_batch() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 4, 2);
    let mut strides = mixed_batch(9, 0);
    strides[3] = stride_with_length(&strides[3], Variable::HipFlexionAngle, 3);
    let result = engine.validate(&strides, VersionId::INITIAL).unwrap();
    assert_eq!(result.valid_strides, 8);
    assert_eq!(result.invalid_strides, 1);
    assert_eq!(result.structural_failures, 1);
    assert_eq!(result.valid_strides + result.invalid_strides, result.total_strides);
    assert_eq!(result.structural[0].index, 3);
    assert!(result.structure.valid);
}

#[test]
fn empty_batch_has_invalid_structure() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 8, 1);
    let result = engine.validate(&[], VersionId::INITIAL).unwrap();
    assert_eq!(result.total_strides, 0);
    assert_eq!(result.pass_rate, 0.0);
    assert!(result.structure.issues.contains(&StructuralError::EmptyDataset));
    assert!(!result.validation_passed);
}

#[test]
fn results_are_identical_across_chunking_and_threads() {
    let store = store();
    let mut strides = mixed_batch(40, 23);
    strides[5] = stride_with_length(&strides[5], Variable::HipFlexionAngle, 12);
    strides.reverse();

    let reference = engine_with(Arc::clone(&store), 1, 1)
        .validate(&strides, VersionId::INITIAL)
        .unwrap();
    for (chunk, threads) in [(7, 1), (7, 4), (64, 3), (256, 2)] {
        let result = engine_with(Arc::clone(&store), chunk, threads)
            .validate(&strides, VersionId::INITIAL)
            .unwrap();
        assert_eq!(result, reference, "chunk {chunk} threads {threads}");
    }
}

#[test]
fn batch_uses_the_pinned_version() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 16, 1);
    let proposal = ProposalBuilder::new(store.current_version())
        .set_range(
            RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50)),
            Range::new(0.0, 1.6, "widened"),
        )
        .build();
    let v2 = store.apply_revision(&proposal).unwrap();
    let strides = mixed_batch(5, 5);

    let v1_result = engine.validate(&strides, VersionId::INITIAL).unwrap();
    let v2_result = engine.validate(&strides, v2).unwrap();
    assert_eq!(v1_result.valid_strides, 5);
    assert_eq!(v2_result.valid_strides, 10);
    assert_eq!(v2_result.spec_version, v2);

    assert!(matches!(
        engine.validate(&strides, VersionId(42)),
        Err(ValidationError::Specification(_))
    ));
}

#[test]
fn stride_limit_is_enforced() {
    let mut config = GaitConfig::default();
    config.batch.max_strides = Some(10);
    let engine = BatchValidationEngine::new(store(), &config);
    let err = engine.validate(&mixed_batch(11, 0), VersionId::INITIAL).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::Resource(ResourceError::TooManyStrides { strides: 11, limit: 10 })
    ));
}

struct StartedRecorder(Mutex<Vec<BatchStartedEvent>>);

impl GaitEventHandler for StartedRecorder {
    fn on_batch_started(&self, event: &BatchStartedEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

#[test]
fn chunk_size_degrades_under_memory_budget() {
    let recorder = Arc::new(StartedRecorder(Mutex::new(Vec::new())));
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());

    let mut config = GaitConfig::default();
    config.batch.chunk_size = Some(256);
    config.batch.min_chunk_size = Some(8);
    config.batch.threads = Some(1);
    config.batch.memory_budget_bytes = Some(100_000);
    let engine = BatchValidationEngine::new(store(), &config).with_events(events);
    let result = engine.validate(&mixed_batch(50, 0), VersionId::INITIAL).unwrap();
    assert_eq!(result.valid_strides, 50);

    let started = recorder.0.lock().unwrap();
    assert_eq!(started.len(), 1);
    assert!(started[0].chunk_size < 256);
    assert!(started[0].chunk_size >= 8);
}

#[test]
fn memory_budget_below_minimum_chunk_fails() {
    let mut config = GaitConfig::default();
    config.batch.min_chunk_size = Some(8);
    config.batch.threads = Some(1);
    config.batch.memory_budget_bytes = Some(10_000);
    let engine = BatchValidationEngine::new(store(), &config);
    let err = engine.validate(&mixed_batch(50, 0), VersionId::INITIAL).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::Resource(ResourceError::MemoryBudgetExceeded { chunk_size: 8, .. })
    ));
}

#[test]
fn cancelled_batch_reports_cancellation() {
    let token = CancellationToken::new();
    token.cancel();
    let engine = engine_with(store(), 4, 1).with_cancellation(token);
    let err = engine.validate(&mixed_batch(20, 0), VersionId::INITIAL).unwrap_err();
    assert!(matches!(err, ValidationError::Cancelled { total: 20, .. }));
}

#[test]
fn rejections_are_audited_only_when_recording() {
    let audit = Arc::new(AuditLog::new());
    let store = store();
    let engine = engine_with(Arc::clone(&store), 8, 2).with_audit(Arc::clone(&audit));
    let strides = mixed_batch(6, 4);

    engine.evaluate(&strides, &store.pin()).unwrap();
    assert!(audit.is_empty());

    engine.validate(&strides, VersionId::INITIAL).unwrap();
    let rejected = audit.query(&AuditQuery::new().kind(AuditEventKind::StrideRejected));
    assert_eq!(rejected.len(), 4);
    let for_subject = audit.query(
        &AuditQuery::new()
            .kind(AuditEventKind::StrideRejected)
            .subject("S000"),
    );
    assert_eq!(for_subject.len(), 1);
}

#[test]
fn dataset_ingestion_feeds_structure_verdict() {
    let store = store();
    let engine = engine_with(Arc::clone(&store), 8, 1);
    let spec = level_walking_spec();
    let strides: Vec<_> = (0..4)
        .map(|i| stride_inside(&spec, "S001", Task::LevelWalking, &format!("c{i}")))
        .collect();

    let dataset = dataset_from_strides(&strides);
    let result = engine.validate_dataset(&dataset, VersionId::INITIAL).unwrap();
    assert_eq!(result.valid_strides, 4);
    assert!(result.structure.valid);

    // An unknown column is a dataset issue; strides still validate.
    let mut with_extra = dataset.clone();
    with_extra.columns.push(ColumnDecl::new("elbow_flexion_angle", "rad"));
    for row in &mut with_extra.rows {
        row.values.push(0.0);
    }
    let result = engine.validate_dataset(&with_extra, VersionId::INITIAL).unwrap();
    assert_eq!(result.valid_strides, 4);
    assert!(!result.structure.valid);
    assert!(result.validation_passed);
}
