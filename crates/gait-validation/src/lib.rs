//! # gait-validation
//!
//! Specification store, range resolution, stride classification, parallel
//! batch validation, specification tuning, dataset ingestion, and the
//! append-only audit log.

pub mod audit;
pub mod batch;
pub mod classify;
pub mod ingest;
pub mod resolver;
pub mod spec;
pub mod tuning;

pub use audit::{AuditEntry, AuditEvent, AuditEventKind, AuditLog, AuditQuery, AuditSink};
pub use batch::{BatchValidationEngine, BatchValidationResult, PartialTally};
pub use classify::{RejectionRecord, Severity, StrideClassifier, StrideVerdict, ViolationKind};
pub use ingest::{assemble_strides, PhaseIndexedDataset};
pub use resolver::{NotFoundReason, RangeLookup, RangeResolver};
pub use spec::{
    ProposalBuilder, ProposedRevision, Range, RangeKey, SpecRevision, SpecificationStore,
    ValidationSpecification, VersionId,
};
pub use tuning::{impact_analysis, ImpactReport, SpecificationTuner, TuningMethod};
