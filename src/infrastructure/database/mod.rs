use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::GroupFeatureState;
use crate::domain::traits::StateStore;
use crate::application::errors::StorageError;

/// SQLite-backed state store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        init_tables(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Ids of all operators, sorted
    pub fn list_operators(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT user_id FROM operators ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut operators = Vec::new();
        for op in rows {
            operators.push(op?);
        }
        Ok(operators)
    }

    /// Every group that was ever written
    pub fn list_groups(&self) -> Result<Vec<GroupFeatureState>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT group_id, enabled, updated_at FROM feature_status ORDER BY group_id"
        )?;
        let rows = stmt.query_map([], |row| {
            let updated_at: String = row.get(2)?;
            Ok(GroupFeatureState {
                group_id: row.get(0)?,
                enabled: row.get(1)?,
                updated_at: chrono::DateTime::parse_from_rfc3339(&updated_at)
                    .map(|t| t.with_timezone(&chrono::Utc))
                    .unwrap_or_default(),
            })
        })?;

        let mut groups = Vec::new();
        for group in rows {
            groups.push(group?);
        }
        Ok(groups)
    }
}

fn init_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS feature_status (
            group_id TEXT PRIMARY KEY NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS operators (
            user_id TEXT PRIMARY KEY NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    Ok(())
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn load_feature_status(&self, group_id: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let enabled: Option<bool> = conn
            .query_row(
                "SELECT enabled FROM feature_status WHERE group_id = ?1",
                [group_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(enabled.unwrap_or(GroupFeatureState::DEFAULT_ENABLED))
    }

    async fn save_feature_status(&self, group_id: &str, enabled: bool) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO feature_status (group_id, enabled, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(group_id) DO UPDATE SET enabled = excluded.enabled, updated_at = excluded.updated_at",
            rusqlite::params![group_id, enabled, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    async fn is_authorized(&self, user_id: &str) -> bool {
        let result = self.conn().and_then(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM operators WHERE user_id = ?1",
                [user_id],
                |row| row.get::<_, i64>(0),
            )
            .map_err(StorageError::from)
        });

        match result {
            Ok(count) => count > 0,
            Err(e) => {
                tracing::error!("Operator lookup failed for {}: {}", user_id, e);
                false
            }
        }
    }

    async fn add_operator(&self, user_id: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO operators (user_id) VALUES (?1)",
            [user_id],
        )?;
        Ok(())
    }

    async fn remove_operator(&self, user_id: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM operators WHERE user_id = ?1", [user_id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_is_disabled_and_load_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.load_feature_status("1").await.unwrap());
        assert!(!store.load_feature_status("1").await.unwrap());
        assert!(store.list_groups().unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_overwrites_flag() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save_feature_status("1", true).await.unwrap();
        assert!(store.load_feature_status("1").await.unwrap());

        store.save_feature_status("1", false).await.unwrap();
        assert!(!store.load_feature_status("1").await.unwrap());

        let groups = store.list_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_id, "1");
        assert!(!groups[0].enabled);
    }

    #[tokio::test]
    async fn operators() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.is_authorized("42").await);

        store.add_operator("42").await.unwrap();
        store.add_operator("42").await.unwrap();
        store.add_operator("7").await.unwrap();
        assert!(store.is_authorized("42").await);
        assert_eq!(store.list_operators().unwrap(), vec!["42".to_string(), "7".to_string()]);

        assert!(store.remove_operator("42").await.unwrap());
        assert!(!store.remove_operator("42").await.unwrap());
        assert!(!store.is_authorized("42").await);
    }

    #[tokio::test]
    async fn file_database_persists() {
        let path = std::env::temp_dir()
            .join(format!("give-me-title-{}", uuid::Uuid::new_v4()))
            .join("data.db");
        {
            let store = SqliteStore::new(&path).unwrap();
            store.save_feature_status("1", true).await.unwrap();
        }
        let store = SqliteStore::new(&path).unwrap();
        assert!(store.load_feature_status("1").await.unwrap());
    }
}
