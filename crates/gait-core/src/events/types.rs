//! Event payload types.

use crate::types::StrideId;

/// Payload for `on_batch_started`.
#[derive(Debug, Clone)]
pub struct BatchStartedEvent {
    pub strides: usize,
    pub spec_version: u32,
    pub chunk_size: usize,
    pub chunks: usize,
}

/// Payload for `on_batch_progress`. Emitted after each chunk.
#[derive(Debug, Clone)]
pub struct BatchProgressEvent {
    pub processed: usize,
    pub total: usize,
}

/// Payload for `on_batch_complete`.
#[derive(Debug, Clone)]
pub struct BatchCompleteEvent {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub structural_failures: usize,
    pub validation_passed: bool,
    pub duration_ms: u64,
}

/// Payload for `on_stride_rejected`.
#[derive(Debug, Clone)]
pub struct StrideRejectedEvent {
    pub stride: StrideId,
    pub spec_version: u32,
    pub violations: usize,
    pub structural: bool,
}

/// Payload for `on_revision_applied`.
#[derive(Debug, Clone)]
pub struct RevisionAppliedEvent {
    pub version: u32,
    pub parent: Option<u32>,
    pub changed_ranges: usize,
}

/// Payload for `on_revision_rolled_back`.
#[derive(Debug, Clone)]
pub struct RevisionRolledBackEvent {
    pub from: u32,
    pub to: u32,
}
