//! Backend doubles for command tests.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::backend::{Backend, BackendError, FileStore};
use crate::server::Context;

/// Wraps an in-memory store and counts every backend call. Can be switched into a mode where
/// every call fails as if the backend were unreachable.
pub(crate) struct RecordingBackend {
    inner: FileStore,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingBackend {
    pub(crate) fn new(scan_batch: usize) -> Self {
        Self {
            inner: FileStore::in_memory(scan_batch),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    pub(crate) fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn record(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused").into());
        }
        Ok(())
    }
}

impl Backend for RecordingBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.record()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<bool, BackendError> {
        self.record()?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        self.record()?;
        self.inner.delete(key).await
    }

    async fn clear(&self) -> Result<(), BackendError> {
        self.record()?;
        self.inner.clear().await
    }

    async fn scan(&self, cursor: u64) -> Result<(u64, Vec<String>), BackendError> {
        self.record()?;
        self.inner.scan(cursor).await
    }

    async fn len(&self) -> Result<u64, BackendError> {
        self.record()?;
        self.inner.len().await
    }

    async fn ping(&self) -> Result<String, BackendError> {
        self.record()?;
        self.inner.ping().await
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

pub(crate) fn context() -> Context<RecordingBackend> {
    Context::new(RecordingBackend::new(2))
}

pub(crate) fn failing_context() -> Context<RecordingBackend> {
    let ctx = context();
    ctx.backend.fail();
    ctx
}

/// Seeds the backend through the regular `set` path and forgets those calls.
pub(crate) async fn seed(ctx: &Context<RecordingBackend>, entries: &[(&str, &str)]) {
    for (key, value) in entries {
        ctx.backend.set(key, value).await.unwrap();
    }
    ctx.backend.reset_calls();
}
