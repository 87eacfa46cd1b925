//! Counter store abstraction and the in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::counter::types::{StoreError, StoredItem};

/// An atomic key-value counter store.
///
/// The store is the synchronization point: callers never read-modify-write.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Add `delta` to `field` of `key`, treating a missing key or field as 0.
    /// Returns the new value of the field.
    async fn atomic_add(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError>;

    /// Read every attribute of `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<StoredItem>, StoreError>;
}

/// One record: each attribute is its own atomic so distinct fields never
/// contend on each other.
#[derive(Debug, Default)]
struct Record {
    fields: DashMap<String, AtomicI64>,
}

impl Record {
    fn add(&self, field: &str, delta: i64) -> i64 {
        if let Some(value) = self.fields.get(field) {
            return value.fetch_add(delta, Ordering::AcqRel) + delta;
        }
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(delta, Ordering::AcqRel)
            + delta
    }

    fn snapshot(&self) -> StoredItem {
        self.fields
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Acquire)))
            .collect()
    }
}

/// Process-local store backed by `DashMap`, with optional JSON snapshots.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<DashMap<String, Arc<Record>>>,
    persistence_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from the snapshot file if it exists.
    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let records: HashMap<String, StoredItem> = serde_json::from_reader(reader)?;

            for (key, item) in records {
                let record = Record::default();
                for (field, value) in item {
                    record.fields.insert(field, AtomicI64::new(value));
                }
                store.inner.insert(key, Arc::new(record));
            }
            tracing::info!(path = %path.display(), records = store.inner.len(), "Loaded counter snapshot");
        }
        Ok(store)
    }

    /// Write the snapshot file, if one is configured.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let records: HashMap<String, StoredItem> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().snapshot()))
                .collect();

            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, &records)?;
            writer.flush()?;
            tracing::info!(path = %path.display(), records = records.len(), "Saved counter snapshot");
        }
        Ok(())
    }

    fn record(&self, key: &str) -> Arc<Record> {
        if let Some(record) = self.inner.get(key) {
            return record.value().clone();
        }
        self.inner.entry(key.to_string()).or_default().value().clone()
    }
}

#[async_trait]
impl CounterStore for InMemoryStore {
    async fn atomic_add(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        Ok(self.record(key).add(field, delta))
    }

    async fn get(&self, key: &str) -> Result<Option<StoredItem>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.value().snapshot()))
    }
}
