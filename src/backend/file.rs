use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::backend::{Backend, BackendError, SCAN_START};

/// A local store kept in memory and mirrored to a JSON file on disk.
///
/// The whole map is rewritten after every mutation: it is serialized to a sibling temporary file
/// which is then renamed over the data file, so a crash mid-write leaves the previous contents
/// intact. A mutation whose write fails is rolled back in memory before the error is returned.
///
/// Scan cursors are ordinal positions in key order.
pub struct FileStore {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
    scan_batch: usize,
}

impl FileStore {
    /// Loads the store from `path`. A missing file yields an empty store; the file and its parent
    /// directories are created on the first write.
    pub async fn open(path: impl Into<PathBuf>, scan_batch: usize) -> Result<Self, BackendError> {
        let path = path.into();
        let entries = match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} keys from {}", entries.len(), path.display());

        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
            scan_batch: scan_batch.max(1),
        })
    }

    /// A store that never touches the disk.
    pub fn in_memory(scan_batch: usize) -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
            scan_batch: scan_batch.max(1),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), BackendError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, path).await?;

        debug!("Persisted {} keys to {}", entries.len(), path.display());
        Ok(())
    }
}

impl Backend for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<bool, BackendError> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }

        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        let mut entries = self.entries.lock().await;
        let Some(previous) = entries.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = self.persist(&entries).await {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }

        Ok(true)
    }

    async fn clear(&self) -> Result<(), BackendError> {
        let mut entries = self.entries.lock().await;
        let previous = std::mem::take(&mut *entries);

        if let Err(e) = self.persist(&entries).await {
            *entries = previous;
            return Err(e);
        }

        Ok(())
    }

    async fn scan(&self, cursor: u64) -> Result<(u64, Vec<String>), BackendError> {
        let entries = self.entries.lock().await;
        let start = usize::try_from(cursor).unwrap_or(usize::MAX);

        let keys: Vec<String> = entries
            .keys()
            .skip(start)
            .take(self.scan_batch)
            .cloned()
            .collect();

        let end = start.saturating_add(keys.len());
        let next = if keys.is_empty() || end >= entries.len() {
            SCAN_START
        } else {
            end as u64
        };

        Ok((next, keys))
    }

    async fn len(&self) -> Result<u64, BackendError> {
        Ok(self.entries.lock().await.len() as u64)
    }

    async fn ping(&self) -> Result<String, BackendError> {
        Ok("PONG".to_string())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("file:{}", path.display()),
            None => "memory".to_string(),
        }
    }
}
