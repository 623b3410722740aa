//! Cache-first catalog fetcher with tiered fallback
//!
//! A read first consults the in-memory cache. On a miss the sheet is fetched
//! once, however many readers are waiting; if that fails the persisted
//! snapshot is used, and if there is none, synthetic data.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{Catalog, CatalogOrigin};
use crate::config::CatalogConfig;
use crate::data::{generate, FetchError, ProductRecord, SheetClient};
use crate::store::{SnapshotStore, StorageError};

/// In-memory catalog cache owned by a single `CatalogFetcher`
///
/// Created empty at startup and handed to the fetcher. Holds either a live
/// result valid for the configured TTL or a fallback result valid for the
/// shorter degraded TTL.
#[derive(Debug, Default)]
pub struct CacheState {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    catalog: Catalog,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached catalog if it is still within its TTL
    fn current(&self) -> Option<Catalog> {
        self.entry
            .as_ref()
            .filter(|entry| entry.stored_at.elapsed() < entry.ttl)
            .map(|entry| entry.catalog.clone())
    }

    fn store(&mut self, catalog: Catalog, ttl: Duration) {
        self.entry = Some(CacheEntry {
            catalog,
            stored_at: Instant::now(),
            ttl,
        });
    }

    fn clear(&mut self) {
        self.entry = None;
    }
}

/// Serves the storefront catalog, never failing a read
pub struct CatalogFetcher {
    client: SheetClient,
    snapshots: Option<SnapshotStore>,
    cache: Mutex<CacheState>,
    /// Held for the duration of a refresh so concurrent readers share it
    in_flight: tokio::sync::Mutex<()>,
    config: CatalogConfig,
}

impl CatalogFetcher {
    /// Creates a fetcher around an externally constructed cache
    ///
    /// # Errors
    /// Returns `FetchError::HttpError` if the HTTP client cannot be built.
    pub fn new(
        config: CatalogConfig,
        snapshots: Option<SnapshotStore>,
        cache: CacheState,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: SheetClient::new(&config)?,
            snapshots,
            cache: Mutex::new(cache),
            in_flight: tokio::sync::Mutex::new(()),
            config,
        })
    }

    /// Returns the current product records
    pub async fn get_products(&self) -> Vec<ProductRecord> {
        self.get_catalog().await.records.as_ref().clone()
    }

    /// Returns the current catalog along with where it came from
    ///
    /// # Behavior
    /// - Returns cached data without network access while it is fresh
    /// - Otherwise fetches the sheet; concurrent callers wait for that one fetch
    /// - On fetch failure returns the persisted snapshot, keeping its timestamp
    /// - With no snapshot either, returns synthetic records
    pub async fn get_catalog(&self) -> Catalog {
        if let Some(catalog) = self.cached() {
            debug!(origin = ?catalog.origin, "catalog cache hit");
            return catalog;
        }

        let _guard = self.in_flight.lock().await;
        // Another caller may have refreshed while we waited for the gate.
        if let Some(catalog) = self.cached() {
            debug!(origin = ?catalog.origin, "catalog served by in-flight refresh");
            return catalog;
        }

        self.refresh().await
    }

    /// Drops the in-memory cache and deletes the persisted snapshot
    ///
    /// The next read goes back to the sheet.
    pub fn clear_cache(&self) -> Result<(), StorageError> {
        self.invalidate();
        match &self.snapshots {
            Some(snapshots) => snapshots.clear(),
            None => Ok(()),
        }
    }

    /// Drops the in-memory cache, keeping the persisted snapshot
    pub fn invalidate(&self) {
        self.lock_cache().clear();
    }

    fn cached(&self) -> Option<Catalog> {
        self.lock_cache().current()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn refresh(&self) -> Catalog {
        match self.client.fetch_records().await {
            Ok(records) => {
                let fetched_at = Utc::now();
                info!(records = records.len(), "fetched live catalog");

                if let Some(snapshots) = &self.snapshots {
                    if let Err(error) = snapshots.save(&records, fetched_at) {
                        warn!(%error, "failed to persist catalog snapshot");
                    }
                }

                let catalog = Catalog::new(records, CatalogOrigin::Live, Some(fetched_at));
                self.lock_cache().store(catalog.clone(), self.config.ttl);
                catalog
            }
            Err(error) => {
                warn!(%error, "remote catalog fetch failed, using fallback");
                let catalog = self.fallback();
                self.lock_cache()
                    .store(catalog.clone(), self.config.degraded_ttl);
                catalog
            }
        }
    }

    /// Snapshot if one is readable and non-empty, otherwise synthetic data
    fn fallback(&self) -> Catalog {
        if let Some(snapshots) = &self.snapshots {
            match snapshots.load() {
                Ok(Some(snapshot)) if !snapshot.products.is_empty() => {
                    info!(
                        records = snapshot.products.len(),
                        fetched_at = %snapshot.timestamp,
                        "serving persisted catalog snapshot"
                    );
                    return Catalog::new(
                        snapshot.products,
                        CatalogOrigin::Snapshot,
                        Some(snapshot.timestamp),
                    );
                }
                Ok(_) => debug!("no persisted catalog snapshot"),
                Err(error) => warn!(%error, "failed to read catalog snapshot"),
            }
        }

        let records = generate(
            self.config.synthetic_count.max(1),
            self.config.featured_count,
            self.config.synthetic_seed,
        );
        info!(records = records.len(), "serving synthetic placeholder catalog");
        Catalog::new(records, CatalogOrigin::Synthetic, None)
    }
}
