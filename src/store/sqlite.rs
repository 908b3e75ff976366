use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, SessionStore};
use crate::error::StoreError;
use crate::model::Session;
use crate::paths;

/// Sessions and key/value entries kept on this device.
pub struct LocalStore {
    db_path: PathBuf,
}

impl LocalStore {
    /// Opens the store under the data directory, creating it if needed.
    pub fn new() -> anyhow::Result<Self> {
        let data_dir = paths::data_dir()?;
        Ok(Self::open(&data_dir.join("chatabubble.db"))?)
    }

    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                body TEXT NOT NULL,
                last_updated INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_last_updated ON sessions(last_updated)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.db_path).map_err(|source| StoreError::Open {
            path: self.db_path.display().to_string(),
            source,
        })
    }

    pub fn load_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let conn = self.connect()?;
        let body: Option<String> = conn
            .query_row("SELECT body FROM sessions WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;

        body.map(|body| decode_session(id, &body)).transpose()
    }

    /// All local sessions, most recently updated first.
    pub fn list_sessions(&self) -> Result<Vec<Session>, StoreError> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT id, body FROM sessions ORDER BY last_updated DESC, id")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, body) = row?;
            sessions.push(decode_session(&id, &body)?);
        }
        Ok(sessions)
    }

    /// Returns `true` if a session was removed.
    pub fn delete_session(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}

impl SessionStore for LocalStore {
    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        let body = serde_json::to_string(session).map_err(|source| StoreError::Corrupt {
            id: session.id.clone(),
            source,
        })?;
        let conn = self.connect()?;

        conn.execute(
            "INSERT OR REPLACE INTO sessions (id, user_id, status, body, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id,
                session.user_id,
                session.status.as_str(),
                body,
                session.last_updated
            ],
        )?;

        Ok(())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        Ok(conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

fn decode_session(id: &str, body: &str) -> Result<Session, StoreError> {
    serde_json::from_str(body).map_err(|source| StoreError::Corrupt {
        id: id.to_string(),
        source,
    })
}
