//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::GaitEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// Handlers may be invoked from rayon worker threads; they must not block.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn GaitEventHandler>>,
}

impl EventDispatcher {
    /// A dispatcher with no handlers. Emitting on it is a no-op.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler. Handlers run in registration order.
    pub fn register(&mut self, handler: Arc<dyn GaitEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Emit an event to all registered handlers.
    ///
    /// A panicking handler does not prevent later handlers from running.
    /// This relies on unwinding: a build with `panic = "abort"` terminates
    /// the process at the first handler panic instead.
    fn emit<F: Fn(&dyn GaitEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing");
            }
        }
    }

    // ---- Batch lifecycle ----
    /// Fired once before the first chunk is classified.
    pub fn emit_batch_started(&self, event: &BatchStartedEvent) {
        self.emit(|h| h.on_batch_started(event));
    }

    pub fn emit_batch_progress(&self, event: &BatchProgressEvent) {
        self.emit(|h| h.on_batch_progress(event));
    }

    pub fn emit_batch_complete(&self, event: &BatchCompleteEvent) {
        self.emit(|h| h.on_batch_complete(event));
    }

    /// Fired per rejected stride, possibly from a worker thread.
    pub fn emit_stride_rejected(&self, event: &StrideRejectedEvent) {
        self.emit(|h| h.on_stride_rejected(event));
    }

    // ---- Specification lifecycle ----
    /// Fired after a revision becomes the current version.
    pub fn emit_revision_applied(&self, event: &RevisionAppliedEvent) {
        self.emit(|h| h.on_revision_applied(event));
    }

    pub fn emit_revision_rolled_back(&self, event: &RevisionRolledBackEvent) {
        self.emit(|h| h.on_revision_rolled_back(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
