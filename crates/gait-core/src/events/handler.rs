//! Event handler trait. Every method defaults to a no-op.

use super::types::*;

pub trait GaitEventHandler: Send + Sync {
    fn on_batch_started(&self, _event: &BatchStartedEvent) {}
    fn on_batch_progress(&self, _event: &BatchProgressEvent) {}
    fn on_batch_complete(&self, _event: &BatchCompleteEvent) {}
    fn on_stride_rejected(&self, _event: &StrideRejectedEvent) {}
    fn on_revision_applied(&self, _event: &RevisionAppliedEvent) {}
    fn on_revision_rolled_back(&self, _event: &RevisionRolledBackEvent) {}
}
