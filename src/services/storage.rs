//! Persistent key-value storage
//!
//! The engine persists two values under fixed keys: the saved product
//! list and the tracking map. The store itself is a collaborator behind
//! a trait so tests can run against an in-memory double; production uses
//! a single JSON document on disk.

use crate::constants::{PRODUCTS_KEY, TRACKING_KEY};
use crate::error::{Error, Result};
use crate::models::{Product, TrackingMap};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// String-keyed store of JSON-serializable values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Key-value store backed by one JSON document on disk
///
/// Writes are read-modify-write under a lock; concurrent writers within
/// the process cannot tear the document.
pub struct JsonFileStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_document(&self) -> Result<serde_json::Map<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| Error::StorageRead(format!("corrupt store document: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(e) => Err(Error::StorageRead(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_document(&self, document: &serde_json::Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::StorageWrite(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let contents = serde_json::to_string_pretty(document)
            .map_err(|e| Error::StorageWrite(format!("serialize failed: {}", e)))?;
        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            Error::StorageWrite(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await.unwrap_or_default();
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }
}

/// Typed access to the engine's two persisted collections
///
/// Read failures degrade to empty collections: a cycle over nothing is
/// harmless, while a cycle aborted on a transient read error is not.
/// Failures are logged, never surfaced.
#[derive(Clone)]
pub struct EngineStorage {
    store: Arc<dyn KeyValueStore>,
}

impl EngineStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load_products(&self) -> Vec<Product> {
        match self.store.get(PRODUCTS_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Product list failed to deserialize, treating as empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Product list read failed, treating as empty");
                Vec::new()
            }
        }
    }

    pub async fn save_products(&self, products: &[Product]) -> Result<()> {
        let value = serde_json::to_value(products)
            .map_err(|e| Error::StorageWrite(format!("serialize products: {}", e)))?;
        self.store.set(PRODUCTS_KEY, value).await
    }

    pub async fn load_tracking(&self) -> TrackingMap {
        match self.store.get(TRACKING_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Tracking map failed to deserialize, treating as empty");
                TrackingMap::new()
            }),
            Ok(None) => TrackingMap::new(),
            Err(e) => {
                warn!(error = %e, "Tracking map read failed, treating as empty");
                TrackingMap::new()
            }
        }
    }

    pub async fn save_tracking(&self, tracking: &TrackingMap) -> Result<()> {
        let value = serde_json::to_value(tracking)
            .map_err(|e| Error::StorageWrite(format!("serialize tracking map: {}", e)))?;
        self.store.set(TRACKING_KEY, value).await
    }
}
