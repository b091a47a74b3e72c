//! Durable mirror for audit entries.

use gait_core::errors::StorageError;

use super::entry::AuditEntry;

/// Receives every entry after it is appended to the in-memory log.
///
/// Implementations must be append-only. A failing sink is logged and skipped;
/// it never fails the operation that produced the entry.
pub trait AuditSink: Send + Sync {
    /// Highest sequence number already stored, 0 when empty. A log attached
    /// to this sink numbers its entries after it.
    fn last_sequence(&self) -> Result<u64, StorageError> {
        Ok(0)
    }

    fn persist(&self, entry: &AuditEntry) -> Result<(), StorageError>;

    fn persist_all(&self, entries: &[AuditEntry]) -> Result<(), StorageError> {
        for entry in entries {
            self.persist(entry)?;
        }
        Ok(())
    }
}
