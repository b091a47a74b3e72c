//! Parallel batch validation and dataset-level aggregation.

pub mod engine;
pub mod result;
pub mod tally;

pub use engine::BatchValidationEngine;
pub use result::{
    BatchValidationResult, CheckPassRate, DatasetStructure, PassRate, RankedReason,
    StrideDecision, StructuralFailure,
};
pub use tally::{Counter, PartialTally, RejectionReason};
