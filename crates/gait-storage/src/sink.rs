//! SQLite-backed `AuditSink`.

use std::path::Path;

use gait_core::config::AuditConfig;
use gait_core::errors::StorageError;
use gait_validation::audit::{AuditEntry, AuditQuery, AuditSink};

use crate::connection::AuditDatabase;
use crate::queries::audit;

/// Mirrors audit entries into the append-only `audit_entries` table.
pub struct SqliteAuditSink {
    db: AuditDatabase,
}

impl SqliteAuditSink {
    pub fn new(db: AuditDatabase) -> Self {
        Self { db }
    }

    /// Open the database named by `[audit] database_path`.
    /// Returns `None` when no path is configured.
    pub fn from_config(config: &AuditConfig) -> Result<Option<Self>, StorageError> {
        let Some(path) = config.database_path.as_deref() else {
            return Ok(None);
        };
        let db = AuditDatabase::open(Path::new(path))?;
        tracing::info!(path, "audit sink opened from config");
        Ok(Some(Self::new(db)))
    }

    pub fn database(&self) -> &AuditDatabase {
        &self.db
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        self.db.with_conn(audit::count)
    }

    pub fn load_entries(
        &self,
        query: &AuditQuery,
        default_limit: usize,
    ) -> Result<Vec<AuditEntry>, StorageError> {
        self.db
            .with_conn(|conn| audit::load_entries(conn, query, default_limit))
    }
}

impl AuditSink for SqliteAuditSink {
    fn last_sequence(&self) -> Result<u64, StorageError> {
        self.db.with_conn(audit::max_sequence)
    }

    fn persist(&self, entry: &AuditEntry) -> Result<(), StorageError> {
        self.db.with_conn(|conn| audit::insert_entry(conn, entry))
    }

    fn persist_all(&self, entries: &[AuditEntry]) -> Result<(), StorageError> {
        self.db.with_conn(|conn| audit::insert_entries(conn, entries))
    }
}
