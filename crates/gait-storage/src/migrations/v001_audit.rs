//! V001: append-only audit_entries table.
//! Filter columns are denormalized from the JSON payload for indexed queries.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS audit_entries (
    sequence INTEGER PRIMARY KEY,
    recorded_at TEXT NOT NULL,
    kind TEXT NOT NULL,
    subject TEXT,
    task TEXT,
    cycle TEXT,
    variable TEXT,
    spec_version INTEGER,
    payload TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_audit_entries_kind
    ON audit_entries(kind);
CREATE INDEX IF NOT EXISTS idx_audit_entries_stride
    ON audit_entries(subject, task, cycle);
CREATE INDEX IF NOT EXISTS idx_audit_entries_version
    ON audit_entries(spec_version);

CREATE TRIGGER IF NOT EXISTS audit_entries_no_update
    BEFORE UPDATE ON audit_entries
BEGIN
    SELECT RAISE(ABORT, 'audit_entries is append-only');
END;

CREATE TRIGGER IF NOT EXISTS audit_entries_no_delete
    BEFORE DELETE ON audit_entries
BEGIN
    SELECT RAISE(ABORT, 'audit_entries is append-only');
END;
"#;
