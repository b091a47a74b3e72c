//! # gait-storage
//!
//! Persistence for gait validation: the specification file round-trip
//! (JSON and YAML) and an append-only SQLite mirror of the audit log.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod sink;
pub mod spec_file;

pub use connection::AuditDatabase;
pub use sink::SqliteAuditSink;
pub use spec_file::{read_specification, write_specification, SpecFormat};
