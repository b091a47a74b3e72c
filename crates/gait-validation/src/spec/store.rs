//! SpecificationStore: append-only arena of revisions with a current pointer.
//!
//! Reads clone an `Arc<SpecRevision>` and never block on other readers.
//! Mutations (`apply_revision`, `rollback`) are serialized behind the write lock
//! and validated in full before anything is appended.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gait_core::errors::SpecificationError;
use gait_core::events::{EventDispatcher, RevisionAppliedEvent, RevisionRolledBackEvent};
use gait_core::types::{Phase, Task, Variable};

use super::proposal::ProposedRevision;
use super::range::Range;
use super::revision::{RevisionSource, SpecDiff, SpecRevision, VersionId};
use super::specification::ValidationSpecification;
use crate::audit::{AuditEvent, AuditLog};
use crate::resolver::{NotFoundReason, RangeResolver};

struct StoreInner {
    revisions: Vec<Arc<SpecRevision>>,
    current: usize,
}

pub struct SpecificationStore {
    inner: RwLock<StoreInner>,
    audit: Option<Arc<AuditLog>>,
    events: EventDispatcher,
}

impl SpecificationStore {
    /// Validate `initial` and record it as version 1.
    pub fn new(
        initial: ValidationSpecification,
        rationale: impl Into<String>,
    ) -> Result<Self, SpecificationError> {
        initial.validate()?;
        let diff = SpecDiff::between(&ValidationSpecification::new(), &initial);
        let revision = SpecRevision::new(
            VersionId::INITIAL,
            None,
            initial,
            diff,
            rationale.into(),
            RevisionSource::Initial,
        );
        tracing::info!(
            version = %revision.version,
            ranges = revision.specification.range_count(),
            fingerprint = revision.fingerprint,
            "specification loaded"
        );
        Ok(Self {
            inner: RwLock::new(StoreInner {
                revisions: vec![Arc::new(revision)],
                current: 0,
            }),
            audit: None,
            events: EventDispatcher::new(),
        })
    }

    /// Attach an audit log. Existing revisions are recorded immediately.
    pub fn with_audit(mut self, audit: Arc<AuditLog>) -> Self {
        for revision in self.read().revisions.iter() {
            audit.record(AuditEvent::RevisionApplied {
                version: revision.version,
                parent: revision.parent,
                diff: revision.diff.clone(),
                rationale: revision.rationale.clone(),
                source: revision.source.clone(),
            });
        }
        self.audit = Some(audit);
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        // Revisions are only appended after full validation, so a poisoned
        // lock still guards a consistent arena.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current_version(&self) -> VersionId {
        let inner = self.read();
        inner.revisions[inner.current].version
    }

    /// Snapshot of the current revision. Batch runs pin this once.
    pub fn pin(&self) -> Arc<SpecRevision> {
        let inner = self.read();
        Arc::clone(&inner.revisions[inner.current])
    }

    pub fn snapshot(&self, version: VersionId) -> Result<Arc<SpecRevision>, SpecificationError> {
        let inner = self.read();
        index_of(&inner, version)
            .map(|i| Arc::clone(&inner.revisions[i]))
            .ok_or(SpecificationError::UnknownVersion {
                version: version.get(),
            })
    }

    /// Exact-match lookup against an explicit version.
    pub fn get_range(
        &self,
        task: Task,
        variable: Variable,
        phase: Phase,
        version: VersionId,
    ) -> Result<Range, NotFoundReason> {
        let revision = self
            .snapshot(version)
            .map_err(|_| NotFoundReason::UnknownVersion)?;
        RangeResolver::new(&revision)
            .resolve(task, variable, phase)
            .into_result()
            .cloned()
    }

    /// Like `get_range`, but a missing range is a `SpecificationError::NotFound`.
    pub fn require_range(
        &self,
        task: Task,
        variable: Variable,
        phase: Phase,
        version: VersionId,
    ) -> Result<Range, SpecificationError> {
        match self.get_range(task, variable, phase, version) {
            Ok(range) => Ok(range),
            Err(NotFoundReason::UnknownVersion) => Err(SpecificationError::UnknownVersion {
                version: version.get(),
            }),
            Err(_) => Err(SpecificationError::NotFound {
                task: task.to_string(),
                variable: variable.to_string(),
                phase: phase.percent(),
                version: version.get(),
            }),
        }
    }

    /// Build the revision `proposed` would produce, without storing it.
    pub fn preview(&self, proposed: &ProposedRevision) -> Result<SpecRevision, SpecificationError> {
        let inner = self.read();
        let base_idx = index_of(&inner, proposed.base).ok_or(SpecificationError::UnknownVersion {
            version: proposed.base.get(),
        })?;
        let base = &inner.revisions[base_idx];
        let specification = proposed.materialize(&base.specification)?;
        let diff = SpecDiff::between(&base.specification, &specification);
        Ok(SpecRevision::new(
            next_version(&inner),
            Some(base.version),
            specification,
            diff,
            proposed.rationale.clone(),
            proposed.source.clone(),
        ))
    }

    /// Validate and append a new revision; it becomes current.
    /// On any error the store is unchanged.
    pub fn apply_revision(
        &self,
        proposed: &ProposedRevision,
    ) -> Result<VersionId, SpecificationError> {
        let revision = {
            let mut inner = self.write();
            let current = inner.revisions[inner.current].version;
            if proposed.base != current {
                return Err(SpecificationError::StaleProposal {
                    base: proposed.base.get(),
                    current: current.get(),
                });
            }
            let base = Arc::clone(&inner.revisions[inner.current]);
            let specification = proposed.materialize(&base.specification)?;
            let diff = SpecDiff::between(&base.specification, &specification);
            let revision = Arc::new(SpecRevision::new(
                next_version(&inner),
                Some(base.version),
                specification,
                diff,
                proposed.rationale.clone(),
                proposed.source.clone(),
            ));
            inner.revisions.push(Arc::clone(&revision));
            inner.current = inner.revisions.len() - 1;
            revision
        };

        tracing::info!(
            version = %revision.version,
            parent = ?revision.parent,
            changes = revision.diff.change_count(),
            fingerprint = revision.fingerprint,
            "specification revision applied"
        );
        if let Some(audit) = &self.audit {
            audit.record(AuditEvent::RevisionApplied {
                version: revision.version,
                parent: revision.parent,
                diff: revision.diff.clone(),
                rationale: revision.rationale.clone(),
                source: revision.source.clone(),
            });
        }
        self.events.emit_revision_applied(&RevisionAppliedEvent {
            version: revision.version.get(),
            parent: revision.parent.map(|p| p.get()),
            changed_ranges: revision.diff.ranges.len(),
        });
        Ok(revision.version)
    }

    /// Move the current pointer to a recorded revision. History is kept.
    pub fn rollback(&self, version: VersionId) -> Result<(), SpecificationError> {
        let from = {
            let mut inner = self.write();
            let idx = index_of(&inner, version).ok_or(SpecificationError::UnknownVersion {
                version: version.get(),
            })?;
            let from = inner.revisions[inner.current].version;
            inner.current = idx;
            from
        };

        tracing::info!(from = %from, to = %version, "specification rolled back");
        if let Some(audit) = &self.audit {
            audit.record(AuditEvent::RevisionRolledBack { from, to: version });
        }
        self.events.emit_revision_rolled_back(&RevisionRolledBackEvent {
            from: from.get(),
            to: version.get(),
        });
        Ok(())
    }

    /// All revisions in append order.
    pub fn history(&self) -> Vec<Arc<SpecRevision>> {
        self.read().revisions.clone()
    }

    pub fn revision_count(&self) -> usize {
        self.read().revisions.len()
    }

    pub fn diff(&self, from: VersionId, to: VersionId) -> Result<SpecDiff, SpecificationError> {
        let a = self.snapshot(from)?;
        let b = self.snapshot(to)?;
        Ok(SpecDiff::between(&a.specification, &b.specification))
    }
}

fn index_of(inner: &StoreInner, version: VersionId) -> Option<usize> {
    // Versions are dense and start at 1.
    let idx = (version.get() as usize).checked_sub(1)?;
    (idx < inner.revisions.len()).then_some(idx)
}

fn next_version(inner: &StoreInner) -> VersionId {
    VersionId(inner.revisions.len() as u32 + 1)
}
