//! Audit entries and event payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gait_core::errors::StructuralError;
use gait_core::types::{StrideId, Task, Variable};

use crate::classify::RejectionRecord;
use crate::spec::{RevisionSource, SpecDiff, VersionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    RevisionApplied {
        version: VersionId,
        parent: Option<VersionId>,
        diff: SpecDiff,
        rationale: String,
        source: RevisionSource,
    },
    RevisionRolledBack {
        from: VersionId,
        to: VersionId,
    },
    StrideRejected {
        record: RejectionRecord,
    },
    StructuralFailure {
        stride: StrideId,
        error: StructuralError,
        spec_version: VersionId,
    },
}

impl AuditEvent {
    pub fn kind(&self) -> AuditEventKind {
        match self {
            Self::RevisionApplied { .. } => AuditEventKind::RevisionApplied,
            Self::RevisionRolledBack { .. } => AuditEventKind::RevisionRolledBack,
            Self::StrideRejected { .. } => AuditEventKind::StrideRejected,
            Self::StructuralFailure { .. } => AuditEventKind::StructuralFailure,
        }
    }

    pub fn stride(&self) -> Option<&StrideId> {
        match self {
            Self::StrideRejected { record } => Some(&record.stride),
            Self::StructuralFailure { stride, .. } => Some(stride),
            _ => None,
        }
    }

    pub fn variable(&self) -> Option<Variable> {
        match self {
            Self::StrideRejected { record } => Some(record.variable),
            _ => None,
        }
    }

    /// The version the event was produced against. For a rollback this is
    /// the version rolled back to.
    pub fn spec_version(&self) -> Option<VersionId> {
        match self {
            Self::RevisionApplied { version, .. } => Some(*version),
            Self::RevisionRolledBack { to, .. } => Some(*to),
            Self::StrideRejected { record } => Some(record.spec_version),
            Self::StructuralFailure { spec_version, .. } => Some(*spec_version),
        }
    }

    /// Whether the event concerns `task`: a stride of that task, or a
    /// revision whose diff touches it.
    pub fn touches_task(&self, task: Task) -> bool {
        match self {
            Self::RevisionApplied { diff, .. } => {
                diff.ranges.iter().any(|d| d.key.task == task)
                    || diff.requirements.iter().any(|d| d.task == task)
            }
            Self::RevisionRolledBack { .. } => false,
            _ => self.stride().is_some_and(|s| s.task == task),
        }
    }

    /// Whether the event concerns `variable`.
    pub fn touches_variable(&self, variable: Variable) -> bool {
        match self {
            Self::RevisionApplied { diff, .. } => {
                diff.ranges.iter().any(|d| d.key.variable == variable)
                    || diff.requirements.iter().any(|d| d.variable == variable)
            }
            Self::StrideRejected { record } => record.variable == variable,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    RevisionApplied,
    RevisionRolledBack,
    StrideRejected,
    StructuralFailure,
}

impl AuditEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RevisionApplied => "revision_applied",
            Self::RevisionRolledBack => "revision_rolled_back",
            Self::StrideRejected => "stride_rejected",
            Self::StructuralFailure => "structural_failure",
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "revision_applied" => Ok(Self::RevisionApplied),
            "revision_rolled_back" => Ok(Self::RevisionRolledBack),
            "stride_rejected" => Ok(Self::StrideRejected),
            "structural_failure" => Ok(Self::StructuralFailure),
            other => Err(format!("unknown audit event kind: {other}")),
        }
    }
}

/// One appended entry. `sequence` starts at 1 and strictly increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}
