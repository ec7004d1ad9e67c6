//! Platform storage implementations
//!
//! File-backed and in-memory implementations of the [`StorageRepository`] port.
//! Values are opaque strings; callers decide the encoding.

use crate::domain::repositories::StorageRepository;
use crate::shared::constants::DEFAULT_DATA_DIR_NAME;
use crate::shared::error::LiquidatorError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

/// Default storage directory under the OS application data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("./data"))
        .join(DEFAULT_DATA_DIR_NAME)
}

/// One file per key inside a data directory.
///
/// Writes go through a temporary file and a rename, so a crashed write
/// never leaves a truncated value behind. Writers are serialized by a
/// process-local lock; there is no cross-process locking.
pub struct FileStorage {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Keys become file names; anything outside [A-Za-z0-9_-] is replaced.
    fn file_path(&self, key: &str) -> Result<PathBuf, LiquidatorError> {
        if key.is_empty() {
            return Err(LiquidatorError::storage("Storage key cannot be empty"));
        }
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        Ok(self.root.join(format!("{}.json", name)))
    }

    /// Keys currently present on disk
    pub async fn list_keys(&self) -> Result<Vec<String>, LiquidatorError> {
        let mut keys = vec![];
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl StorageRepository for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, LiquidatorError> {
        let path = self.file_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LiquidatorError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LiquidatorError> {
        let path = self.file_path(key)?;
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.root).await.map_err(|e| {
            LiquidatorError::storage(format!("Failed to create {}: {}", self.root.display(), e))
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value.as_bytes()).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }
        fs::rename(&tmp, &path).await?;
        log::debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), LiquidatorError> {
        let path = self.file_path(key)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl StorageRepository for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, LiquidatorError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LiquidatorError> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), LiquidatorError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}
