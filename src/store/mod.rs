//! Durable local storage
//!
//! This module provides a small key-value store that persists JSON values to
//! the filesystem with write-then-rename semantics, and the snapshot store
//! built on top of it that keeps the last successfully fetched catalog.

mod local;
mod snapshot;

pub use local::{LocalStore, StorageError};
pub use snapshot::{CatalogSnapshot, SnapshotStore};
