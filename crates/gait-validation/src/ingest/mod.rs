//! Assembly of `Stride`s from phase-indexed dataset rows.

pub mod assemble;
pub mod dataset;

pub use assemble::{assemble_strides, IngestReport, RejectedGroup};
pub use dataset::{ColumnDecl, DatasetRow, PhaseIndexedDataset};
