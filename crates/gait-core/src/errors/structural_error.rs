//! Structural errors: malformed strides and datasets.

use super::error_code::{self, GaitErrorCode};

/// A stride or dataset whose shape is wrong before any value is read.
/// Fatal to the affected stride; never silently patched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum StructuralError {
    #[error("variable {variable} has {actual} samples, expected {expected}")]
    WrongPointCount {
        variable: String,
        expected: usize,
        actual: usize,
    },

    #[error("required variable {variable} is missing for task {task}")]
    MissingVariable { task: String, variable: String },

    #[error("unknown task label: {label}")]
    UnknownTask { label: String },

    #[error("unknown variable column: {name}")]
    UnknownVariable { name: String },

    #[error("column {column} declares unit {declared}, expected {expected}")]
    UnitMismatch {
        column: String,
        declared: String,
        expected: String,
    },

    #[error("row {row} has {actual} values for {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("phase value {phase} is outside 0..=100")]
    InvalidPhase { phase: String },

    #[error("phase value {phase} appears more than once in one cycle")]
    DuplicatePhase { phase: String },

    #[error("dataset is empty")]
    EmptyDataset,
}

impl GaitErrorCode for StructuralError {
    fn error_code(&self) -> &'static str {
        error_code::STRUCTURAL_ERROR
    }
}

impl StructuralError {
    /// Short stable tag used when ranking rejection reasons.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            Self::WrongPointCount { .. } => "wrong_point_count",
            Self::MissingVariable { .. } => "missing_variable",
            Self::UnknownTask { .. } => "unknown_task",
            Self::UnknownVariable { .. } => "unknown_variable",
            Self::UnitMismatch { .. } => "unit_mismatch",
            Self::RowWidthMismatch { .. } => "row_width_mismatch",
            Self::InvalidPhase { .. } => "invalid_phase",
            Self::DuplicatePhase { .. } => "duplicate_phase",
            Self::EmptyDataset => "empty_dataset",
        }
    }
}
