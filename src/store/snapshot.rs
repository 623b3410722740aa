//! Last-known-good catalog persisted for offline fallback

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LocalStore, StorageError};
use crate::data::ProductRecord;

/// Key the snapshot is stored under
const SNAPSHOT_KEY: &str = "products_cache";

/// The most recent successful remote fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Records as fetched
    pub products: Vec<ProductRecord>,
    /// When the fetch happened, stored as unix milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Owns the on-disk snapshot; every save overwrites the previous one
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    store: LocalStore,
}

impl SnapshotStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Replaces the stored snapshot
    pub fn save(&self, products: &[ProductRecord], timestamp: DateTime<Utc>) -> Result<(), StorageError> {
        #[derive(Serialize)]
        struct SnapshotRef<'a> {
            products: &'a [ProductRecord],
            #[serde(with = "chrono::serde::ts_milliseconds")]
            timestamp: DateTime<Utc>,
        }

        self.store
            .write(SNAPSHOT_KEY, &SnapshotRef { products, timestamp })
    }

    /// Loads the stored snapshot, if any
    pub fn load(&self) -> Result<Option<CatalogSnapshot>, StorageError> {
        self.store.read(SNAPSHOT_KEY)
    }

    /// Deletes the stored snapshot
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(SNAPSHOT_KEY)
    }
}
