//! BatchValidationEngine: chunked parallel classification over a pinned
//! specification snapshot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use gait_core::config::{BatchConfig, GaitConfig};
use gait_core::constants::VERDICT_OVERHEAD_BYTES;
use gait_core::errors::{ResourceError, StructuralError, ValidationError};
use gait_core::events::{
    BatchCompleteEvent, BatchProgressEvent, BatchStartedEvent, EventDispatcher,
    StrideRejectedEvent,
};
use gait_core::traits::{Cancellable, CancellationToken};
use gait_core::types::Stride;

use super::result::{BatchValidationResult, DatasetStructure};
use super::tally::PartialTally;
use crate::audit::{AuditEvent, AuditLog};
use crate::classify::StrideClassifier;
use crate::ingest::{assemble_strides, PhaseIndexedDataset, RejectedGroup};
use crate::spec::{SpecRevision, SpecificationStore, VersionId};

/// Dataset-level context folded into the structural verdict.
#[derive(Default)]
struct DatasetContext {
    issues: Vec<StructuralError>,
    rejected_groups: Vec<RejectedGroup>,
}

pub struct BatchValidationEngine {
    store: Arc<SpecificationStore>,
    classifier: StrideClassifier,
    batch: BatchConfig,
    record_rejections: bool,
    audit: Option<Arc<AuditLog>>,
    events: EventDispatcher,
    cancel: CancellationToken,
}

impl BatchValidationEngine {
    pub fn new(store: Arc<SpecificationStore>, config: &GaitConfig) -> Self {
        Self {
            store,
            classifier: StrideClassifier::from_config(&config.classifier),
            batch: config.batch.clone(),
            record_rejections: config.audit.effective_record_rejections(),
            audit: None,
            events: EventDispatcher::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_audit(mut self, audit: Arc<AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn classifier(&self) -> &StrideClassifier {
        &self.classifier
    }

    pub fn store(&self) -> &Arc<SpecificationStore> {
        &self.store
    }

    /// Pin `version` once and validate every stride against it.
    pub fn validate(
        &self,
        strides: &[Stride],
        version: VersionId,
    ) -> Result<BatchValidationResult, ValidationError> {
        let revision = self.store.snapshot(version)?;
        self.validate_snapshot(strides, &revision)
    }

    /// Validate against an already pinned revision and record the outcome.
    pub fn validate_snapshot(
        &self,
        strides: &[Stride],
        revision: &SpecRevision,
    ) -> Result<BatchValidationResult, ValidationError> {
        self.run(strides, revision, DatasetContext::default(), true)
    }

    /// Validate without touching the audit log or emitting rejection events.
    /// Used for what-if evaluation of unstored revisions.
    pub fn evaluate(
        &self,
        strides: &[Stride],
        revision: &SpecRevision,
    ) -> Result<BatchValidationResult, ValidationError> {
        self.run(strides, revision, DatasetContext::default(), false)
    }

    /// Assemble strides from rows, then validate them. Ingestion issues and
    /// rejected groups count against the dataset structure.
    pub fn validate_dataset(
        &self,
        dataset: &PhaseIndexedDataset,
        version: VersionId,
    ) -> Result<BatchValidationResult, ValidationError> {
        let revision = self.store.snapshot(version)?;
        let report = assemble_strides(dataset, &revision.specification);
        let context = DatasetContext {
            issues: report.dataset_issues,
            rejected_groups: report.rejected_groups,
        };
        self.run(&report.strides, &revision, context, true)
    }

    fn run(
        &self,
        strides: &[Stride],
        revision: &SpecRevision,
        context: DatasetContext,
        record: bool,
    ) -> Result<BatchValidationResult, ValidationError> {
        let start = Instant::now();
        let total = strides.len();

        let limit = self.batch.effective_max_strides();
        if total > limit {
            return Err(ResourceError::TooManyStrides {
                strides: total,
                limit,
            }
            .into());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.batch.effective_threads())
            .build()
            .map_err(|e| ResourceError::WorkerPool {
                message: e.to_string(),
            })?;
        let chunk_size = self.plan_chunk_size(strides, pool.current_num_threads())?;
        let chunks = total.div_ceil(chunk_size);

        tracing::info!(
            strides = total,
            spec_version = %revision.version,
            chunk_size,
            chunks,
            threads = pool.current_num_threads(),
            "batch validation started"
        );
        self.events.emit_batch_started(&BatchStartedEvent {
            strides: total,
            spec_version: revision.version.get(),
            chunk_size,
            chunks,
        });

        let budget_ms = self.batch.effective_time_budget_ms();
        let processed = AtomicUsize::new(0);

        let tally = pool.install(|| {
            strides
                .par_chunks(chunk_size)
                .enumerate()
                .map(|(chunk_idx, chunk)| {
                    if self.cancel.is_cancelled() {
                        return Err(ValidationError::Cancelled {
                            processed: processed.load(Ordering::Relaxed),
                            total,
                        });
                    }
                    if start.elapsed().as_millis() > u128::from(budget_ms) {
                        return Err(ResourceError::TimeBudgetExceeded {
                            budget_ms,
                            processed: processed.load(Ordering::Relaxed),
                            total,
                        }
                        .into());
                    }

                    let base = chunk_idx * chunk_size;
                    let mut tally = PartialTally::new();
                    for (offset, stride) in chunk.iter().enumerate() {
                        match self.classifier.classify(stride, revision) {
                            Ok(verdict) => tally.record_verdict(base + offset, verdict),
                            Err(error) => tally.record_structural(base + offset, stride, error),
                        }
                    }

                    let done = processed.fetch_add(chunk.len(), Ordering::Relaxed) + chunk.len();
                    tracing::debug!(chunk = chunk_idx, strides = chunk.len(), done, "chunk classified");
                    self.events.emit_batch_progress(&BatchProgressEvent {
                        processed: done,
                        total,
                    });
                    Ok(tally)
                })
                .try_reduce(PartialTally::new, |a, b| Ok(a.combine(b)))
        })?;

        if record {
            self.record(&tally, revision);
        }

        let structure = DatasetStructure::assess(
            &tally,
            context.issues,
            context.rejected_groups,
            self.batch.effective_max_structural_failure_fraction(),
        );
        let result = BatchValidationResult::from_tally(
            tally,
            revision,
            self.classifier.policy(),
            structure,
            self.batch.effective_top_reasons(),
        );

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            total = result.total_strides,
            valid = result.valid_strides,
            invalid = result.invalid_strides,
            structural_failures = result.structural_failures,
            pass_rate = result.pass_rate,
            structure_valid = result.structure.valid,
            validation_passed = result.validation_passed,
            duration_ms,
            "batch validation complete"
        );
        self.events.emit_batch_complete(&BatchCompleteEvent {
            total: result.total_strides,
            valid: result.valid_strides,
            invalid: result.invalid_strides,
            structural_failures: result.structural_failures,
            validation_passed: result.validation_passed,
            duration_ms,
        });
        Ok(result)
    }

    /// Start from the configured chunk size and halve it until the in-flight
    /// working set fits the memory budget. Below `min_chunk_size` the batch
    /// is refused.
    fn plan_chunk_size(&self, strides: &[Stride], threads: usize) -> Result<usize, ResourceError> {
        let configured = self.batch.effective_chunk_size().max(1);
        if strides.is_empty() {
            return Ok(configured);
        }
        let floor = self.batch.effective_min_chunk_size().clamp(1, configured);
        let budget = self.batch.effective_memory_budget_bytes();

        let total_bytes: u64 = strides.iter().map(Stride::approx_bytes).sum();
        let per_stride = total_bytes / strides.len() as u64 + VERDICT_OVERHEAD_BYTES;
        let in_flight = threads.max(1) as u64;
        let estimate = |chunk: usize| (chunk as u64) * per_stride * in_flight;

        let mut chunk = configured;
        while estimate(chunk) > budget && chunk > floor {
            chunk = (chunk / 2).max(floor);
        }
        if estimate(chunk) > budget {
            return Err(ResourceError::MemoryBudgetExceeded {
                required: estimate(chunk),
                budget,
                chunk_size: chunk,
            });
        }
        if chunk < configured {
            tracing::warn!(
                configured,
                chunk_size = chunk,
                budget,
                "chunk size reduced to fit memory budget"
            );
        }
        Ok(chunk)
    }

    fn record(&self, tally: &PartialTally, revision: &SpecRevision) {
        let version = revision.version;
        for (index, failure) in &tally.structural_failures {
            tracing::debug!(index, stride = %failure.stride, error = %failure.error, "structural failure");
        }
        if !self.events.is_empty() {
            for (index, decision) in &tally.decisions {
                if decision.keep {
                    continue;
                }
                let violations = tally.rejections.get(index).map_or(0, Vec::len);
                self.events.emit_stride_rejected(&StrideRejectedEvent {
                    stride: decision.stride.clone(),
                    spec_version: version.get(),
                    violations,
                    structural: tally.structural_failures.contains_key(index),
                });
            }
        }

        let Some(audit) = &self.audit else {
            return;
        };
        if !self.record_rejections {
            return;
        }
        let rejections = tally
            .rejections
            .values()
            .flatten()
            .map(|record| AuditEvent::StrideRejected {
                record: record.clone(),
            });
        let structural = tally
            .structural_failures
            .values()
            .map(|failure| AuditEvent::StructuralFailure {
                stride: failure.stride.clone(),
                error: failure.error.clone(),
                spec_version: version,
            });
        let appended = audit.record_all(rejections.chain(structural));
        tracing::debug!(appended, spec_version = %version, "rejections recorded");
    }
}
