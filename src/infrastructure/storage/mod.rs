//! File-based storage implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use crate::domain::entities::GroupFeatureState;
use crate::domain::traits::StateStore;
use crate::application::errors::StorageError;

/// On-disk layout of the JSON store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    groups: BTreeMap<String, GroupFeatureState>,
    #[serde(default)]
    operators: BTreeSet<String>,
}

/// JSON file-based store.
///
/// The whole snapshot is cached in memory and rewritten on every change.
/// Writes go to a temporary file in the same directory that is synced and
/// renamed over the original. The directory is synced afterwards so the
/// rename itself survives a crash.
pub struct JsonStore {
    path: PathBuf,
    state: Arc<RwLock<Snapshot>>,
}

impl JsonStore {
    /// Open the store at `path`, starting empty if the file does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Snapshot::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Opened JSON store {} ({} groups, {} operators)",
            path.display(),
            snapshot.groups.len(),
            snapshot.operators.len()
        );

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(snapshot)),
        })
    }

    /// Stored state of a group, if it was ever written
    pub async fn group_state(&self, group_id: &str) -> Option<GroupFeatureState> {
        self.state.read().await.groups.get(group_id).cloned()
    }

    /// Apply `change` to a copy of the snapshot, persist it, then publish it.
    /// On a failed write the cached snapshot is left untouched.
    async fn commit<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        change(&mut next);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    std::fs::File::open(parent)?.sync_all()?;

    Ok(())
}

#[async_trait]
impl StateStore for JsonStore {
    async fn load_feature_status(&self, group_id: &str) -> Result<bool, StorageError> {
        let state = self.state.read().await;
        Ok(state.groups
            .get(group_id)
            .map(|g| g.enabled)
            .unwrap_or(GroupFeatureState::DEFAULT_ENABLED))
    }

    async fn save_feature_status(&self, group_id: &str, enabled: bool) -> Result<(), StorageError> {
        self.commit(|s| {
            s.groups.insert(group_id.to_string(), GroupFeatureState::new(group_id, enabled));
        })
        .await
    }

    async fn is_authorized(&self, user_id: &str) -> bool {
        self.state.read().await.operators.contains(user_id)
    }

    async fn add_operator(&self, user_id: &str) -> Result<(), StorageError> {
        if self.is_authorized(user_id).await {
            return Ok(());
        }
        self.commit(|s| {
            s.operators.insert(user_id.to_string());
        })
        .await
    }

    async fn remove_operator(&self, user_id: &str) -> Result<bool, StorageError> {
        if !self.is_authorized(user_id).await {
            return Ok(false);
        }
        self.commit(|s| {
            s.operators.remove(user_id);
        })
        .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("give-me-title-{}", uuid::Uuid::new_v4()))
            .join("data.json")
    }

    #[tokio::test]
    async fn unseen_group_is_disabled_and_not_written() {
        let path = temp_path();
        let store = JsonStore::open(&path).await.unwrap();

        assert!(!store.load_feature_status("1").await.unwrap());
        assert!(!store.load_feature_status("1").await.unwrap());
        assert!(store.group_state("1").await.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn saved_status_survives_reopen() {
        let path = temp_path();
        {
            let store = JsonStore::open(&path).await.unwrap();
            store.save_feature_status("1", true).await.unwrap();
            store.save_feature_status("2", false).await.unwrap();
            store.add_operator("42").await.unwrap();
        }

        let store = JsonStore::open(&path).await.unwrap();
        assert!(store.load_feature_status("1").await.unwrap());
        assert!(!store.load_feature_status("2").await.unwrap());
        assert!(store.is_authorized("42").await);
        assert!(!store.is_authorized("43").await);
    }

    #[tokio::test]
    async fn operators_can_be_removed() {
        let store = JsonStore::open(temp_path()).await.unwrap();
        store.add_operator("42").await.unwrap();
        store.add_operator("42").await.unwrap();

        assert!(store.remove_operator("42").await.unwrap());
        assert!(!store.remove_operator("42").await.unwrap());
        assert!(!store.is_authorized("42").await);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = temp_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let result = JsonStore::open(&path).await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files_behind() {
        let path = temp_path();
        let store = JsonStore::open(&path).await.unwrap();
        store.save_feature_status("1", true).await.unwrap();
        store.save_feature_status("1", false).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("data.json")]);
    }

    #[tokio::test]
    async fn failed_write_keeps_cached_state() {
        let path = temp_path();
        let dir = path.parent().unwrap().to_path_buf();
        let store = JsonStore::open(&path).await.unwrap();
        store.save_feature_status("1", true).await.unwrap();

        // Replace the directory with a plain file so the next write cannot land
        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, b"").unwrap();

        assert!(store.save_feature_status("1", false).await.is_err());
        assert!(store.add_operator("42").await.is_err());
        assert!(store.load_feature_status("1").await.unwrap());
        assert!(!store.is_authorized("42").await);

        std::fs::remove_file(&dir).unwrap();
    }
}
