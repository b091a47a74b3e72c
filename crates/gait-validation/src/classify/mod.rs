//! Per-stride classification against a pinned specification revision.

pub mod classifier;
pub mod record;

pub use classifier::StrideClassifier;
pub use record::{CheckOutcome, RejectionRecord, Severity, StrideVerdict, ViolationKind};
