//! Storage backends the command dispatcher runs against.
//!
//! Every backend exposes the same small capability set. Aggregate operations (`entries`, `keys`)
//! are layered on top of the cursor based `scan` primitive: keys are listed in batches and values
//! are fetched afterwards, one key at a time. Nothing isolates those round-trips from concurrent
//! writers, so a full scan may miss keys written while it runs, report keys more than once, or
//! skip keys removed between the listing and the fetch. Callers get a weakly consistent view.

pub mod file;
pub mod remote;

use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use thiserror::Error as ThisError;

pub use self::file::FileStore;
pub use self::remote::RedisStore;

/// Cursor value that both starts a scan and signals its end.
pub const SCAN_START: u64 = 0;

pub type Entry = (String, String);

#[derive(Debug, ThisError)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),
    #[error("backend I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("backend data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait Backend: Send + Sync + 'static {
    /// Returns `None` for keys that do not exist.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, BackendError>> + Send;

    /// Returns whether the write was acknowledged.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;

    /// Returns `true` iff the key existed and was removed.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool, BackendError>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Lists one batch of keys starting at `cursor`. The returned cursor is [`SCAN_START`] once
    /// the scan is exhausted.
    fn scan(
        &self,
        cursor: u64,
    ) -> impl Future<Output = Result<(u64, Vec<String>), BackendError>> + Send;

    /// Number of keys, taken from the backend's own counter rather than a scan.
    fn len(&self) -> impl Future<Output = Result<u64, BackendError>> + Send;

    fn ping(&self) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// A short description of the backend target, e.g. `file:/path/to/data.json`.
    fn describe(&self) -> String;

    /// Lazily walks every `(key, value)` pair. Each call starts a fresh scan.
    ///
    /// Keys that disappear between the listing and the value fetch are skipped.
    fn entries(&self) -> impl Stream<Item = Result<Entry, BackendError>> + Send + '_ {
        stream::try_unfold(Some(SCAN_START), move |cursor| async move {
            let Some(cursor) = cursor else {
                return Ok::<_, BackendError>(None);
            };

            let (next, keys) = self.scan(cursor).await?;
            let mut batch: Vec<Result<Entry, BackendError>> = Vec::with_capacity(keys.len());
            for key in keys {
                if let Some(value) = self.get(&key).await? {
                    batch.push(Ok((key, value)));
                }
            }

            let next = (next != SCAN_START).then_some(next);
            Ok(Some((stream::iter(batch), next)))
        })
        .try_flatten()
    }

    /// Every key, in scan order, without fetching values.
    fn keys(&self) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send {
        async move {
            let mut keys = Vec::new();
            let mut cursor = SCAN_START;
            loop {
                let (next, batch) = self.scan(cursor).await?;
                keys.extend(batch);
                if next == SCAN_START {
                    return Ok(keys);
                }
                cursor = next;
            }
        }
    }
}
