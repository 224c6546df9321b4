//! Key-value storage backends.
//!
//! `FileStore` is durable: each key is a JSON file in a directory and survives restarts.
//! `MemoryStore` is session-scoped: it lives as long as the value that owns it.

use crate::utils;
use anyhow::{ensure, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

/// A string-keyed store of string values.
#[async_trait]
pub trait KeyValueStore: Debug + Send + Sync {
    /// Returns the value for `key`, or `None` if no value has been set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Sets the value for `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Durable storage in a directory, one `{key}.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        ensure!(
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "Invalid storage key '{key}'"
        );
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        trace!("Reading {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // Write beside the target and rename over it so a reader never sees a partial value.
        let path = self.path(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        trace!("Writing {}", path.display());
        utils::write(&tmp, value).await?;
        utils::rename(&tmp, &path).await
    }
}

/// Session-scoped storage held in memory. Clones share the same values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
