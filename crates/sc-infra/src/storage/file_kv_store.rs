use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sc_core::ports::{KeyValueStorePort, StorageError};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Key/value store backed by a single JSON object file.
///
/// Mirrors browser local storage: string keys and values, a total size
/// quota counted over keys plus values, and whole-file rewrites. Writes go
/// to a temporary file that is renamed over the target, so the file always
/// holds either the previous or the new contents.
pub struct FileKeyValueStore {
    path: PathBuf,
    quota_bytes: u64,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>, quota_bytes: u64) -> Self {
        Self {
            path: path.into(),
            quota_bytes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::Io(format!(
                    "read {} failed: {e}",
                    self.path.display()
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    /// Like [`Self::read_map`], but a corrupt file is replaced on the next write.
    async fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map().await {
            Err(StorageError::Corrupt(reason)) => {
                warn!(reason = %reason, "Overwriting corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn check_quota(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let required: u64 = map
            .iter()
            .map(|(key, value)| (key.len() + value.len()) as u64)
            .sum();
        if required > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                required,
                limit: self.quota_bytes,
            });
        }
        Ok(())
    }

    async fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::Io(format!("create store dir failed: {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    async fn atomic_write(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string(map)
            .map_err(|e| StorageError::Io(format!("serialize store failed: {e}")))?;
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &content).await.map_err(|e| {
            StorageError::Io(format!("write temp store failed: {}: {e}", tmp_path.display()))
        })?;

        // TODO: rename over an existing file is not atomic on every Windows filesystem.
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StorageError::Io(format!(
                "rename temp store to target failed: {} -> {}: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), bytes = content.len(), "Store file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut map = self.read_map().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map_for_write().await?;
        map.insert(key.to_string(), value.to_string());
        self.check_quota(&map)?;
        self.atomic_write(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map_for_write().await?;
        if map.remove(key).is_some() {
            self.atomic_write(&map).await?;
        }
        Ok(())
    }
}
