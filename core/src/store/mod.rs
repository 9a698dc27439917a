//! SQLite record store.
//!
//! RULE: Only the store talks to the database.
//! The engines work on loaded `AccountRecord`s and never execute SQL.
//!
//! The dashboard opens the store read-only. The write path
//! (`create` / `migrate` / `insert_accounts`) exists for the demo
//! seeder and tests only.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::ACCOUNT_TABLE;
use rusqlite::{Connection, OpenFlags};

mod account;

pub struct AccountStore {
    conn: Connection,
    path: Option<String>, // None for :memory:
}

impl AccountStore {
    /// Open an existing database read-only. A missing file or a file
    /// without the account table is reported as `StoreUnavailable`.
    pub fn open_read_only(path: &str) -> AnalyticsResult<Self> {
        let unavailable = |source| AnalyticsError::StoreUnavailable {
            path: path.to_string(),
            source,
        };
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(unavailable)?;
        conn.prepare(&format!("SELECT account_id FROM {ACCOUNT_TABLE} LIMIT 0"))
            .map_err(unavailable)?;
        log::info!("Opened record store {path} (read-only)");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open (or create) a writable database at `path`.
    pub fn create(path: &str) -> AnalyticsResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> AnalyticsResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AnalyticsResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_accounts.sql"))?;
        Ok(())
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Close the underlying connection.
    pub fn close(self) -> AnalyticsResult<()> {
        let path = self.path.clone().unwrap_or_else(|| ":memory:".into());
        self.conn.close().map_err(|(_, e)| AnalyticsError::Database(e))?;
        log::info!("Closed record store {path}");
        Ok(())
    }
}
