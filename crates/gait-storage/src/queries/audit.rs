//! Queries for the audit_entries table. Inserts and reads only.

use chrono::{DateTime, Utc};
use gait_core::errors::StorageError;
use gait_validation::audit::{AuditEntry, AuditEvent, AuditQuery};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

pub fn insert_entry(conn: &Connection, entry: &AuditEntry) -> Result<(), StorageError> {
    let payload = serde_json::to_string(&entry.event).map_err(|e| StorageError::Serialization {
        message: e.to_string(),
    })?;
    let stride = entry.event.stride();
    conn.prepare_cached(
        "INSERT INTO audit_entries
            (sequence, recorded_at, kind, subject, task, cycle, variable, spec_version, payload)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            entry.sequence as i64,
            entry.timestamp.to_rfc3339(),
            entry.event.kind().as_str(),
            stride.map(|s| s.subject.as_str()),
            stride.map(|s| s.task.as_str()),
            stride.map(|s| s.cycle.as_str()),
            entry.event.variable().map(|v| v.as_str()),
            entry.event.spec_version().map(|v| i64::from(v.get())),
            payload,
        ])
    })
    .map_err(sqlite_err)?;
    Ok(())
}

/// Insert many entries in one transaction.
pub fn insert_entries(conn: &Connection, entries: &[AuditEntry]) -> Result<(), StorageError> {
    let tx = conn.unchecked_transaction().map_err(sqlite_err)?;
    for entry in entries {
        insert_entry(&tx, entry)?;
    }
    tx.commit().map_err(sqlite_err)
}

pub fn count(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM audit_entries", [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(sqlite_err)
}

pub fn max_sequence(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COALESCE(MAX(sequence), 0) FROM audit_entries",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(sqlite_err)
}

/// Entries matching `query`, in sequence order.
///
/// Kind, subject, stride and version are filtered in SQL; task and variable
/// also match revisions whose diff touches them, so those are checked on the
/// decoded event.
pub fn load_entries(
    conn: &Connection,
    query: &AuditQuery,
    default_limit: usize,
) -> Result<Vec<AuditEntry>, StorageError> {
    let mut sql = String::from(
        "SELECT sequence, recorded_at, payload FROM audit_entries WHERE 1 = 1",
    );
    let mut args: Vec<Value> = Vec::new();
    if let Some(kind) = query.kind {
        args.push(Value::Text(kind.as_str().to_string()));
        sql.push_str(&format!(" AND kind = ?{}", args.len()));
    }
    if let Some(subject) = &query.subject {
        args.push(Value::Text(subject.clone()));
        sql.push_str(&format!(" AND subject = ?{}", args.len()));
    }
    if let Some(stride) = &query.stride {
        args.push(Value::Text(stride.subject.clone()));
        sql.push_str(&format!(" AND subject = ?{}", args.len()));
        args.push(Value::Text(stride.task.as_str().to_string()));
        sql.push_str(&format!(" AND task = ?{}", args.len()));
        args.push(Value::Text(stride.cycle.clone()));
        sql.push_str(&format!(" AND cycle = ?{}", args.len()));
    }
    if let Some(version) = query.spec_version {
        args.push(Value::Integer(i64::from(version.get())));
        sql.push_str(&format!(" AND spec_version = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY sequence ASC");

    let mut stmt = conn.prepare(&sql).map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params_from_iter(args), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(sqlite_err)?;

    let limit = query.limit.unwrap_or(default_limit);
    let mut entries = Vec::new();
    for row in rows {
        let (sequence, recorded_at, payload) = row.map_err(sqlite_err)?;
        let entry = decode_row(sequence, &recorded_at, &payload)?;
        if query.matches(&entry) {
            entries.push(entry);
            if entries.len() >= limit {
                break;
            }
        }
    }
    Ok(entries)
}

fn decode_row(sequence: i64, recorded_at: &str, payload: &str) -> Result<AuditEntry, StorageError> {
    let timestamp = DateTime::parse_from_rfc3339(recorded_at)
        .map_err(|e| StorageError::Serialization {
            message: format!("entry {sequence}: bad timestamp {recorded_at}: {e}"),
        })?
        .with_timezone(&Utc);
    let event: AuditEvent = serde_json::from_str(payload).map_err(|e| StorageError::Serialization {
        message: format!("entry {sequence}: {e}"),
    })?;
    Ok(AuditEntry {
        sequence: sequence as u64,
        timestamp,
        event,
    })
}
