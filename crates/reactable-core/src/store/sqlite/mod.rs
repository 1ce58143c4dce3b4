//! SQLite-backed reaction store.
//!
//! Runtime defaults are conservative:
//! - `journal_mode = WAL` so readers proceed while an import writes
//! - `busy_timeout = 5s` to absorb transient lock failures under contention
//! - `foreign_keys = ON` to keep reaction rows tied to subjects and actors

pub mod import;
pub mod migrations;
pub mod query;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::{path::Path, time::Duration};
use uuid::Uuid;

use super::{CustomEmojiRegistry, ReactionQuery, ReactionStore, ReactorRow, SubjectStore};
use crate::model::{CustomEmoji, ReactableSubject};

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the store database, apply runtime pragmas, and migrate
/// the schema to the latest version.
///
/// # Errors
///
/// Returns an error if opening/configuring/migrating the database fails.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create store directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("open reaction store {}", path.display()))?;

    configure_connection(&conn).context("configure sqlite pragmas")?;
    migrations::migrate(&mut conn).context("apply store migrations")?;

    Ok(conn)
}

/// Open the store if it exists and looks healthy.
///
/// Returns `Ok(None)` when the file is missing or unreadable, or when the
/// version recorded in `store_meta` disagrees with `PRAGMA user_version`,
/// so the caller can ask the user to re-initialize it.
///
/// # Errors
///
/// Returns an error only for unexpected failures.
pub fn try_open_store(path: &Path) -> Result<Option<Connection>> {
    if !path.exists() {
        return Ok(None);
    }

    match open_store(path) {
        Ok(conn) => {
            if versions_agree(&conn) {
                Ok(Some(conn))
            } else {
                tracing::warn!(path = %path.display(), "reaction store corrupt");
                Ok(None)
            }
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to open reaction store"
            );
            Ok(None)
        }
    }
}

fn versions_agree(conn: &Connection) -> bool {
    match (
        query::schema_version(conn),
        migrations::current_schema_version(conn),
    ) {
        (Ok(recorded), Ok(applied)) => recorded == applied,
        _ => false,
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// All three store contracts over one SQLite connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the store at `path`, creating and migrating it as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        open_store(path).map(Self::new)
    }

    /// In-memory migrated store, for tests and scratch use.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate or migrate the database.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().context("open in-memory store")?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("enable foreign keys")?;
        migrations::migrate(&mut conn).context("apply store migrations")?;
        Ok(Self::new(conn))
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl ReactionStore for SqliteStore {
    fn find_reactors(&self, query: &ReactionQuery) -> Result<Vec<ReactorRow>> {
        query::find_reactors(&self.conn, query)
    }
}

impl CustomEmojiRegistry for SqliteStore {
    fn find_custom_emoji(&self, id: Uuid) -> Result<Option<CustomEmoji>> {
        query::get_custom_emoji(&self.conn, id)
    }
}

impl SubjectStore for SqliteStore {
    fn find_subject(&self, id: Uuid) -> Result<Option<ReactableSubject>> {
        query::get_subject(&self.conn, id)
    }
}
