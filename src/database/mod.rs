pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// The single handle to the embedded item store.
///
/// Mutations open a transaction lazily and stay pending until [`ItemStore::save`];
/// [`ItemStore::reset`] discards them. Reads always see pending changes.
pub struct ItemStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ItemStore {
    /// Opens (or creates) the database at `path` and migrates the schema
    pub fn open(path: &Path) -> Result<Self, AppError> {
        // Make sure the parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::StoreInit(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::StoreInit(format!("Cannot open {}: {}", path.display(), e)))?;

        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| AppError::StoreInit(format!("Cannot enable WAL: {}", e)))?;
        log::debug!("Journal mode: {}", mode);

        let store = Self::init(conn, Some(path.to_path_buf()))?;
        log::info!("Item store opened at {}", path.display());
        Ok(store)
    }

    /// Opens a private in-memory store (tests, previews)
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::StoreInit(format!("Cannot open in-memory store: {}", e)))?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, AppError> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| AppError::StoreInit(format!("Cannot enable foreign keys: {}", e)))?;
        schema::init_schema(&conn)
            .map_err(|e| AppError::StoreInit(format!("Schema migration failed: {}", e)))?;
        Ok(Self { conn, path })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Starts the pending change set if none is open yet
    pub fn begin_write(&self) -> Result<(), AppError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN IMMEDIATE")?;
        }
        Ok(())
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Commits all pending changes
    pub fn save(&self) -> Result<(), AppError> {
        if self.has_pending_changes() {
            self.conn.execute_batch("COMMIT")?;
            log::debug!("Item store saved");
        }
        Ok(())
    }

    /// Discards all pending changes; subsequent reads refetch committed state
    pub fn reset(&self) -> Result<(), AppError> {
        if self.has_pending_changes() {
            self.conn.execute_batch("ROLLBACK")?;
            log::debug!("Item store reset, pending changes discarded");
        }
        Ok(())
    }
}

impl Drop for ItemStore {
    fn drop(&mut self) {
        if self.has_pending_changes() {
            log::warn!("Item store dropped with unsaved changes, rolling back");
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
