//! Per-room preference storage.
//!
//! Two independent override slots per room: a language code and an
//! auto-transcribe flag. Either, both, or neither may be present; absence of
//! a row is the only "unset" state. Writes are single-row upserts with
//! last-write-wins semantics and no transactional coupling between the two
//! preference kinds.

use crate::error::StorageResult;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Trait for preference store backends.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Upsert the language override for a room.
    async fn set_language(&self, room_id: &str, language: &str) -> StorageResult<()>;

    /// The language override for a room, if one is stored.
    async fn language(&self, room_id: &str) -> StorageResult<Option<String>>;

    /// Upsert the auto-transcribe override for a room.
    async fn set_auto(&self, room_id: &str, auto: bool) -> StorageResult<()>;

    /// The auto-transcribe override for a room, if one is stored.
    async fn auto(&self, room_id: &str) -> StorageResult<Option<bool>>;
}

/// In-memory preference store.
///
/// Fast but not persistent across restarts; used in tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    languages: RwLock<HashMap<String, String>>,
    autos: RwLock<HashMap<String, bool>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn set_language(&self, room_id: &str, language: &str) -> StorageResult<()> {
        self.languages
            .write()
            .await
            .insert(room_id.to_owned(), language.to_owned());
        Ok(())
    }

    async fn language(&self, room_id: &str) -> StorageResult<Option<String>> {
        Ok(self.languages.read().await.get(room_id).cloned())
    }

    async fn set_auto(&self, room_id: &str, auto: bool) -> StorageResult<()> {
        self.autos.write().await.insert(room_id.to_owned(), auto);
        Ok(())
    }

    async fn auto(&self, room_id: &str) -> StorageResult<Option<bool>> {
        Ok(self.autos.read().await.get(room_id).copied())
    }
}

/// SQLite-backed preference store.
///
/// Every operation is a single-row statement, so the connection sits behind
/// one async mutex rather than a pool.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (and migrate) a store at the given database path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store.
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn migrate(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS language_preferences (
                room_id  TEXT NOT NULL,
                language TEXT NOT NULL,
                PRIMARY KEY (room_id)
            );
            CREATE TABLE IF NOT EXISTS auto_preferences (
                room_id TEXT NOT NULL,
                auto    BOOL NOT NULL,
                PRIMARY KEY (room_id)
            );",
        )?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqliteStore {
    async fn set_language(&self, room_id: &str, language: &str) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO language_preferences (room_id, language) VALUES (?1, ?2)
             ON CONFLICT (room_id) DO UPDATE SET language=excluded.language",
            params![room_id, language],
        )?;
        debug!(room_id, language, "language preference stored");
        Ok(())
    }

    async fn language(&self, room_id: &str) -> StorageResult<Option<String>> {
        let conn = self.conn.lock().await;
        let value = conn
            .query_row(
                "SELECT language FROM language_preferences WHERE room_id=?1",
                params![room_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set_auto(&self, room_id: &str, auto: bool) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO auto_preferences (room_id, auto) VALUES (?1, ?2)
             ON CONFLICT (room_id) DO UPDATE SET auto=excluded.auto",
            params![room_id, auto],
        )?;
        debug!(room_id, auto, "auto preference stored");
        Ok(())
    }

    async fn auto(&self, room_id: &str) -> StorageResult<Option<bool>> {
        let conn = self.conn.lock().await;
        let value = conn
            .query_row(
                "SELECT auto FROM auto_preferences WHERE room_id=?1",
                params![room_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

/// Default database path (`~/.stenographer/preferences.db`).
#[must_use]
pub fn store_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stenographer")
        .join("preferences.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn roundtrip(store: &dyn PreferenceStore) {
        // Absent rows
        assert_eq!(store.language("!a").await.unwrap(), None);
        assert_eq!(store.auto("!a").await.unwrap(), None);

        // Round-trip
        store.set_language("!a", "fr").await.unwrap();
        store.set_auto("!a", true).await.unwrap();
        assert_eq!(store.language("!a").await.unwrap().as_deref(), Some("fr"));
        assert_eq!(store.auto("!a").await.unwrap(), Some(true));

        // Upsert replaces
        store.set_language("!a", "de").await.unwrap();
        store.set_auto("!a", false).await.unwrap();
        assert_eq!(store.language("!a").await.unwrap().as_deref(), Some("de"));
        assert_eq!(store.auto("!a").await.unwrap(), Some(false));

        // Overrides are independent and per-room
        assert_eq!(store.language("!b").await.unwrap(), None);
        store.set_auto("!b", true).await.unwrap();
        assert_eq!(store.language("!b").await.unwrap(), None);
        assert_eq!(store.auto("!b").await.unwrap(), Some(true));
        assert_eq!(store.language("!a").await.unwrap().as_deref(), Some("de"));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        roundtrip(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let store = SqliteStore::in_memory().unwrap();
        roundtrip(&store).await;
    }
}
