//! AuditLog: in-memory append-only log with an optional durable sink.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use gait_core::config::AuditConfig;
use gait_core::constants::DEFAULT_AUDIT_QUERY_LIMIT;

use super::entry::{AuditEntry, AuditEvent};
use super::query::AuditQuery;
use super::sink::AuditSink;

/// Entries are appended under a mutex and never removed or edited.
///
/// Sequence numbers continue from `base`, the highest sequence the attached
/// sink already holds, so a reopened durable log is never overwritten.
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    base: u64,
    sink: Option<Arc<dyn AuditSink>>,
    query_limit: usize,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog {
    /// Create an empty in-memory log numbering from 1.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            base: 0,
            sink: None,
            query_limit: DEFAULT_AUDIT_QUERY_LIMIT,
        }
    }

    /// Apply the query limit from config. The durable sink named by
    /// `database_path` is opened by the storage crate and attached with
    /// [`AuditLog::with_sink`].
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new().with_query_limit(config.effective_query_limit())
    }

    /// Attach a durable sink and continue numbering after the highest
    /// sequence it already stores. If the sink cannot report one, numbering
    /// is left unchanged and the failure is logged.
    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        match sink.last_sequence() {
            Ok(stored) => {
                if stored > 0 {
                    tracing::debug!(stored, "audit log resuming after stored entries");
                }
                self.base = self.base.max(stored);
            }
            Err(e) => {
                tracing::warn!(error = %e, "audit sink could not report its last sequence");
            }
        }
        self.sink = Some(sink);
        self
    }

    pub fn with_query_limit(mut self, limit: usize) -> Self {
        self.query_limit = limit;
        self
    }

    fn next_sequence(&self, entries: &[AuditEntry]) -> u64 {
        self.base + entries.len() as u64 + 1
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AuditEntry>> {
        // Appends are a single push; a poisoned log is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append one event and return its sequence number.
    pub fn record(&self, event: AuditEvent) -> u64 {
        let mut entries = self.lock();
        let entry = AuditEntry {
            sequence: self.next_sequence(&entries),
            timestamp: Utc::now(),
            event,
        };
        let sequence = entry.sequence;
        // Persist under the lock so the sink sees entries in sequence order.
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.persist(&entry) {
                tracing::warn!(sequence, error = %e, "audit sink failed; entry kept in memory only");
            }
        }
        entries.push(entry);
        sequence
    }

    /// Append many events as one contiguous run of sequence numbers.
    /// Returns the number appended.
    pub fn record_all(&self, events: impl IntoIterator<Item = AuditEvent>) -> usize {
        let mut entries = self.lock();
        let start = entries.len();
        let timestamp = Utc::now();
        for event in events {
            let sequence = self.next_sequence(&entries);
            entries.push(AuditEntry {
                sequence,
                timestamp,
                event,
            });
        }
        let appended = &entries[start..];
        if let Some(sink) = &self.sink {
            if !appended.is_empty() {
                if let Err(e) = sink.persist_all(appended) {
                    tracing::warn!(
                        count = appended.len(),
                        error = %e,
                        "audit sink failed; entries kept in memory only"
                    );
                }
            }
        }
        appended.len()
    }

    /// Matching entries in sequence order, capped at the query's limit
    /// or the configured default.
    pub fn query(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        let limit = query.limit.unwrap_or(self.query_limit);
        self.lock()
            .iter()
            .filter(|e| query.matches(e))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Snapshot of this session's entries. Entries already stored by the
    /// sink before it was attached are not loaded.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sequence of the newest entry, or the sink's stored maximum when
    /// nothing has been recorded in this session.
    pub fn last_sequence(&self) -> u64 {
        self.lock().last().map_or(self.base, |e| e.sequence)
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("entries", &self.len())
            .field("sink", &self.sink.is_some())
            .field("query_limit", &self.query_limit)
            .finish()
    }
}
