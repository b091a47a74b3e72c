//! Single serialized connection to the audit database.

pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gait_core::errors::StorageError;
use rusqlite::Connection;

use self::pragmas::apply_pragmas;
use crate::migrations;

/// Owns the audit database connection. Writes are append-only and small,
/// so one mutex-guarded connection serves both reads and writes.
pub struct AuditDatabase {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl AuditDatabase {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "audit database opened");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::SqliteError {
            message: "audit connection lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
