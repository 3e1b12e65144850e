// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable store for queued actions.
//!
//! The [`QueueStore`] persists [`QueueItem`]s in the `offline_queue` table.
//! Every mutation is a single statement, so a concurrent reader never sees a
//! half-updated row. Reads always hit live state; nothing is cached.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::item::QueueItem;

/// SQL schema for the offline queue.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS offline_queue (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    idempotency_key TEXT NOT NULL UNIQUE,
    action TEXT NOT NULL,
    payload TEXT NOT NULL,
    synced INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    synced_at INTEGER,
    attempts INTEGER NOT NULL DEFAULT 0,
    last_error TEXT
);

CREATE INDEX IF NOT EXISTS idx_offline_queue_pending
    ON offline_queue(synced, created_at, seq);
"#;

const SELECT_COLUMNS: &str = "idempotency_key, action, payload, synced, created_at, \
     synced_at, attempts, last_error";

/// Run schema creation and migrations on a connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    migrate_add_failure_columns(conn)?;
    Ok(())
}

/// Migration: add failure bookkeeping to queues created before it existed.
fn migrate_add_failure_columns(conn: &Connection) -> Result<()> {
    let columns = [
        ("attempts", "INTEGER NOT NULL DEFAULT 0"),
        ("last_error", "TEXT"),
    ];

    for (column, decl) in columns {
        let has_column: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM pragma_table_info('offline_queue') WHERE name = ?1",
                [column],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !has_column {
            let sql = format!("ALTER TABLE offline_queue ADD COLUMN {column} {decl}");
            conn.execute(&sql, [])?;
        }
    }
    Ok(())
}

/// Map a row selected with [`SELECT_COLUMNS`] to a [`QueueItem`].
fn row_to_item(row: &Row<'_>) -> std::result::Result<QueueItem, rusqlite::Error> {
    let payload_str: String = row.get(2)?;
    let payload = serde_json::from_str(&payload_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!("invalid payload JSON: {e}"))),
        )
    })?;
    let attempts: i64 = row.get(6)?;

    Ok(QueueItem {
        idempotency_key: row.get(0)?,
        action: row.get(1)?,
        payload,
        synced: row.get(3)?,
        created_at: row.get(4)?,
        synced_at: row.get(5)?,
        attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
        last_error: row.get(7)?,
    })
}

/// Durable queue of actions backed by SQLite.
pub struct QueueStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl QueueStore {
    /// Open a store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;
        run_migrations(&conn)?;

        Ok(QueueStore {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(QueueStore {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file backing this store, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves SQLite itself consistent
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert an item unless its key is already present.
    ///
    /// Returns `true` if the item was inserted, `false` if an item with the
    /// same idempotency key already existed (the new one is dropped).
    pub fn append(&self, item: &QueueItem) -> Result<bool> {
        let payload = serde_json::to_string(&item.payload)?;
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO offline_queue
                 (idempotency_key, action, payload, synced, created_at, synced_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.idempotency_key,
                item.action,
                payload,
                item.synced,
                item.created_at,
                item.synced_at,
            ],
        )?;

        if changed == 0 {
            tracing::debug!(key = %item.idempotency_key, "duplicate idempotency key, dropping");
        }
        Ok(changed == 1)
    }

    /// The earliest unsynced item, or `None` when the queue is drained.
    pub fn next_unsynced(&self) -> Result<Option<QueueItem>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM offline_queue
             WHERE synced = 0
             ORDER BY created_at ASC, seq ASC
             LIMIT 1"
        );
        let item = self.conn().query_row(&sql, [], row_to_item).optional()?;
        Ok(item)
    }

    /// Mark an item as synced.
    ///
    /// Idempotent: returns `true` only if the item existed and was unsynced.
    pub fn mark_synced(&self, key: &str, synced_at: i64) -> Result<bool> {
        let changed = self.conn().execute(
            "UPDATE offline_queue SET synced = 1, synced_at = ?2
             WHERE idempotency_key = ?1 AND synced = 0",
            params![key, synced_at],
        )?;
        Ok(changed == 1)
    }

    /// Record a failed replay attempt for an unsynced item.
    pub fn record_failure(&self, key: &str, message: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE offline_queue SET attempts = attempts + 1, last_error = ?2
             WHERE idempotency_key = ?1 AND synced = 0",
            params![key, message],
        )?;
        Ok(())
    }

    /// Number of unsynced items.
    pub fn pending_count(&self) -> Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM offline_queue WHERE synced = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Look up an item by idempotency key.
    pub fn get(&self, key: &str) -> Result<Option<QueueItem>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM offline_queue WHERE idempotency_key = ?1");
        let item = self
            .conn()
            .query_row(&sql, params![key], row_to_item)
            .optional()?;
        Ok(item)
    }

    /// List items in replay order. Synced items are included only on request.
    pub fn list(&self, include_synced: bool) -> Result<Vec<QueueItem>> {
        let filter = if include_synced { "" } else { "WHERE synced = 0" };
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM offline_queue {filter}
             ORDER BY created_at ASC, seq ASC"
        );
        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Delete synced items that were synced before `cutoff_ms`.
    ///
    /// Unsynced items are never deleted. Returns the number of rows removed.
    pub fn purge_synced_before(&self, cutoff_ms: i64) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM offline_queue
             WHERE synced = 1 AND COALESCE(synced_at, created_at) < ?1",
            params![cutoff_ms],
        )?;
        tx.commit()?;
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
