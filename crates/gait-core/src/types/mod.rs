//! Locomotion vocabulary: closed enumerations validated at ingestion.

pub mod phase;
pub mod stride;
pub mod task;
pub mod variable;

pub use phase::Phase;
pub use stride::{Stride, StrideId};
pub use task::Task;
pub use variable::{Kind, Unit, Variable};
