//! Catalog retrieval and querying
//!
//! The fetcher serves reads from a time-bounded in-memory cache and degrades
//! through the persisted snapshot and synthetic data when the sheet is
//! unreachable. The query layer holds pure filters over a record slice.

mod fetcher;
pub mod query;

pub use fetcher::{CacheState, CatalogFetcher};
pub use query::Selection;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::ProductRecord;

/// Where the records in a `Catalog` came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrigin {
    /// Freshly fetched from the sheet
    Live,
    /// Read back from the persisted snapshot
    Snapshot,
    /// Generated placeholder data
    Synthetic,
}

/// A catalog result together with its provenance
#[derive(Debug, Clone)]
pub struct Catalog {
    /// The records, shared between the cache and callers
    pub records: Arc<Vec<ProductRecord>>,
    /// Which tier produced the records
    pub origin: CatalogOrigin,
    /// When the data was fetched from the sheet; `None` for synthetic data
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn new(records: Vec<ProductRecord>, origin: CatalogOrigin, fetched_at: Option<DateTime<Utc>>) -> Self {
        Self {
            records: Arc::new(records),
            origin,
            fetched_at,
        }
    }

    /// Whether this catalog is anything other than a live fetch
    pub fn is_degraded(&self) -> bool {
        self.origin != CatalogOrigin::Live
    }
}
