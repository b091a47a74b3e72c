//! Audit log filters.

use gait_core::types::{StrideId, Task, Variable};

use super::entry::{AuditEntry, AuditEventKind};
use crate::spec::VersionId;

/// All set filters must match. `limit` caps the number of returned entries;
/// when unset the log's configured default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditQuery {
    pub subject: Option<String>,
    pub task: Option<Task>,
    pub variable: Option<Variable>,
    pub stride: Option<StrideId>,
    pub kind: Option<AuditEventKind>,
    pub spec_version: Option<VersionId>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    pub fn variable(mut self, variable: Variable) -> Self {
        self.variable = Some(variable);
        self
    }

    pub fn stride(mut self, stride: StrideId) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn kind(mut self, kind: AuditEventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn spec_version(mut self, version: VersionId) -> Self {
        self.spec_version = Some(version);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        let event = &entry.event;
        if let Some(kind) = self.kind {
            if event.kind() != kind {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if event.stride().map(|s| &s.subject) != Some(subject) {
                return false;
            }
        }
        if let Some(stride) = &self.stride {
            if event.stride() != Some(stride) {
                return false;
            }
        }
        if let Some(task) = self.task {
            if !event.touches_task(task) {
                return false;
            }
        }
        if let Some(variable) = self.variable {
            if !event.touches_variable(variable) {
                return false;
            }
        }
        if let Some(version) = self.spec_version {
            if event.spec_version() != Some(version) {
                return false;
            }
        }
        true
    }
}
