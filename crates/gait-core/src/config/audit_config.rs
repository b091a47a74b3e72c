//! Audit log configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AUDIT_QUERY_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Record every rejection from batch runs. Default: true.
    pub record_rejections: Option<bool>,
    /// Path of the SQLite audit database, if persisted.
    pub database_path: Option<String>,
    /// Maximum entries returned by one query. Default: 1000.
    pub query_limit: Option<usize>,
}

impl AuditConfig {
    pub fn effective_record_rejections(&self) -> bool {
        self.record_rejections.unwrap_or(true)
    }

    pub fn effective_query_limit(&self) -> usize {
        self.query_limit.unwrap_or(DEFAULT_AUDIT_QUERY_LIMIT)
    }
}
