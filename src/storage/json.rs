//! JSON file-based favorites store.
//!
//! Keeps the whole favorites set in memory and rewrites the file on every
//! toggle, using write-to-temp + rename so the file is never left half
//! written.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "favorites": {
//!     "/works/OL45804W": { "key": "/works/OL45804W", "added_at": 1718000000 }
//!   }
//! }
//! ```

use crate::domain::error::{BookExplorerError, Result};
use crate::domain::normalize_work_key;
use crate::storage::backend::FavoritesStore;
use crate::storage::models::FavoriteRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};

const STORAGE_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FavoritesData {
    version: u32,

    #[serde(default)]
    favorites: BTreeMap<String, FavoriteRecord>,
}

impl Default for FavoritesData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            favorites: BTreeMap::new(),
        }
    }
}

impl FavoritesData {
    fn keys(&self) -> BTreeSet<String> {
        self.favorites.keys().cloned().collect()
    }
}

/// Favorites store persisted to a JSON file.
///
/// Toggles hold an async mutex across the read-modify-write and the file
/// write, so concurrent toggles from different screens serialize. Every
/// successful toggle publishes the new key set to all subscribers.
pub struct JsonFavoritesStore {
    /// `None` keeps favorites in memory only.
    file_path: Option<PathBuf>,

    data: Mutex<FavoritesData>,

    keys: watch::Sender<BTreeSet<String>>,
}

impl JsonFavoritesStore {
    /// Opens the store at `file_path`, loading existing favorites if present.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but contains invalid JSON
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bookexplorer::storage::JsonFavoritesStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonFavoritesStore::open(PathBuf::from("/tmp/favorites.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening favorites store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no favorites file yet, starting empty");
            FavoritesData::default()
        };

        tracing::debug!(favorite_count = data.favorites.len(), "favorites store ready");
        Ok(Self::from_data(Some(file_path), data))
    }

    /// Creates a store that never touches the filesystem.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::from_data(None, FavoritesData::default())
    }

    fn from_data(file_path: Option<PathBuf>, data: FavoritesData) -> Self {
        let (keys, _) = watch::channel(data.keys());
        Self {
            file_path,
            data: Mutex::new(data),
            keys,
        }
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn load_from_file(path: &Path) -> Result<FavoritesData> {
        let contents = std::fs::read_to_string(path)?;
        let data: FavoritesData = serde_json::from_str(&contents)
            .map_err(|e| BookExplorerError::Storage(format!("failed to parse favorites JSON: {e}")))?;

        if data.version != STORAGE_VERSION {
            tracing::warn!(version = data.version, "unexpected favorites file version");
        }
        Ok(data)
    }

    /// Writes `data` to the backing file through a temporary sibling.
    async fn persist(&self, data: &FavoritesData) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| BookExplorerError::Storage(format!("failed to serialize favorites: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, path).await?;

        tracing::trace!(path = ?path, "favorites saved");
        Ok(())
    }
}

#[async_trait]
impl FavoritesStore for JsonFavoritesStore {
    fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.keys.subscribe()
    }

    fn snapshot(&self) -> BTreeSet<String> {
        self.keys.borrow().clone()
    }

    async fn toggle(&self, key: &str) -> Result<bool> {
        let key = normalize_work_key(key);
        let mut data = self.data.lock().await;

        let mut next = data.clone();
        let now_favorite = if next.favorites.remove(&key).is_some() {
            false
        } else {
            next.favorites.insert(key.clone(), FavoriteRecord::new(key.clone()));
            true
        };

        if let Err(e) = self.persist(&next).await {
            tracing::warn!(key = %key, error = %e, "failed to persist favorite toggle");
            return Err(e);
        }

        *data = next;
        self.keys.send_replace(data.keys());
        drop(data);

        tracing::debug!(key = %key, favorite = now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    async fn is_favorite(&self, key: &str) -> Result<bool> {
        let key = normalize_work_key(key);
        Ok(self.data.lock().await.favorites.contains_key(&key))
    }
}

impl std::fmt::Debug for JsonFavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFavoritesStore")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}
