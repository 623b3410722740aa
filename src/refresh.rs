//! Background catalog refresh
//!
//! Periodically pulls the catalog through the fetcher in the background and
//! reports each result over a tokio channel. Reads still go through the
//! fetcher's cache, so a tick inside the TTL costs no network access.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use crate::catalog::{CatalogFetcher, CatalogOrigin};

/// Messages sent from the background refresh to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshMessage {
    /// A pass began; the catalog read may suspend on the network
    RefreshStarted,
    /// A refresh pass finished
    CatalogRefreshed {
        /// Number of records now served
        records: usize,
        /// Tier that served them
        origin: CatalogOrigin,
        /// When the served data was fetched from the sheet
        fetched_at: Option<DateTime<Utc>>,
    },
}

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between refresh passes
    pub interval: Duration,
    /// When false, `spawn` starts no task
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300), // 5 minutes
            enabled: true,
        }
    }
}

/// Owner side of a running refresh loop
pub struct RefreshHandle {
    receiver: mpsc::Receiver<RefreshMessage>,
    /// Signals the task to stop
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the refresh task; the first pass runs immediately
    pub fn spawn(fetcher: Arc<CatalogFetcher>, config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if msg_tx.send(RefreshMessage::RefreshStarted).await.is_err() {
                                break;
                            }

                            let catalog = fetcher.get_catalog().await;
                            let message = RefreshMessage::CatalogRefreshed {
                                records: catalog.records.len(),
                                origin: catalog.origin,
                                fetched_at: catalog.fetched_at,
                            };
                            if msg_tx.send(message).await.is_err() {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            debug!("catalog refresh shutting down");
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Waits for the next message; `None` once the task has stopped
    pub async fn recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.recv().await
    }

    /// Returns a pending message, if any, without waiting
    pub fn try_recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }

    /// Stops the loop after its current pass
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
