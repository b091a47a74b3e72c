//! Append-only audit log of rejections and specification revisions.

pub mod entry;
pub mod log;
pub mod query;
pub mod sink;

pub use entry::{AuditEntry, AuditEvent, AuditEventKind};
pub use log::AuditLog;
pub use query::AuditQuery;
pub use sink::AuditSink;
