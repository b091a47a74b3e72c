//! Specification errors: lookups, loads, and revisions.

use super::error_code::{self, GaitErrorCode};

/// Errors raised by the specification store and by specification loading.
/// An invalid revision is rejected wholesale; the store is left unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecificationError {
    #[error("no range for task {task}, variable {variable}, phase {phase}% in version {version}")]
    NotFound {
        task: String,
        variable: String,
        phase: u8,
        version: u32,
    },

    #[error("invalid range for {key}: min {min} must be < max {max}")]
    InvalidRange { key: String, min: f64, max: f64 },

    #[error("non-finite bound for {key}")]
    NonFiniteBound { key: String },

    #[error("unknown task: {label}")]
    UnknownTask { label: String },

    #[error("unknown variable: {label}")]
    UnknownVariable { label: String },

    #[error("unknown phase: {label}")]
    UnknownPhase { label: String },

    #[error("variable {variable} has ranges but is not required by task {task}")]
    VariableNotRequired { task: String, variable: String },

    #[error("unknown specification version: {version}")]
    UnknownVersion { version: u32 },

    #[error("proposal is based on version {base} but current version is {current}")]
    StaleProposal { base: u32, current: u32 },

    #[error("proposal contains no changes")]
    EmptyProposal,
}

impl GaitErrorCode for SpecificationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::SPECIFICATION_NOT_FOUND,
            Self::UnknownVersion { .. } => error_code::UNKNOWN_VERSION,
            Self::StaleProposal { .. } => error_code::STALE_PROPOSAL,
            _ => error_code::INVALID_SPECIFICATION,
        }
    }
}
