use super::{DraftStore, Listener, MemoryStore, SubscriptionId};
use crate::core::error::StoreError;
use crate::core::value::{Draft, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Draft store mirrored to a JSON object on disk after every write.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// A missing file starts an empty draft.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let draft = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Draft::new(),
            Ok(raw) => serde_json::from_str::<Draft>(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Draft::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = draft.len(), "draft loaded");

        Ok(Self {
            path,
            inner: MemoryStore::from_draft(draft),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.inner.snapshot()).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, raw).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl DraftStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(key, value)?;
        self.persist()
    }

    fn merge(&mut self, values: Draft) -> Result<(), StoreError> {
        self.inner.merge(values)?;
        self.persist()
    }

    fn snapshot(&self) -> Draft {
        self.inner.snapshot()
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}
