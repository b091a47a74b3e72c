//! # gait-core
//!
//! Foundation crate for gait stride validation.
//! Defines the locomotion vocabulary (tasks, variables, phases, strides),
//! errors, config, events, tracing, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::GaitConfig;
pub use errors::{
    ResourceError, SpecificationError, StructuralError, TuningError, ValidationError,
};
pub use traits::{Cancellable, CancellationToken};
pub use types::{Kind, Phase, Stride, StrideId, Task, Unit, Variable};
