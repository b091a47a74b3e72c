//! Versioned numeric range specifications.
//!
//! A specification maps `(task, variable, phase)` to a `Range`. The store keeps
//! an append-only arena of immutable revisions plus a movable current pointer.

pub mod proposal;
pub mod range;
pub mod revision;
pub mod specification;
pub mod store;

pub use proposal::{ProposalBuilder, ProposedRevision, RevisionChange};
pub use range::{BoundSide, CriticalPredicate, Range};
pub use revision::{RangeDelta, RequirementDelta, RevisionSource, SpecDiff, SpecRevision, VersionId};
pub use specification::{NestedSpecification, RangeKey, TaskSpecification, ValidationSpecification};
pub use store::SpecificationStore;
