//! Statistically derived range proposals and their impact on reference data.
//!
//! Nothing here mutates the specification store. The tuner produces an inert
//! `ProposedRevision`; committing it is a separate `apply_revision` call.

pub mod impact;
pub mod method;
pub mod tuner;

pub use impact::{impact_analysis, ImpactReport, RateDelta};
pub use method::TuningMethod;
pub use tuner::{SkippedProposal, SpecificationTuner, TuningOutcome};
