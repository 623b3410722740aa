//! Runtime configuration for the catalog pipeline

use std::time::Duration;

/// Settings shared by the sheet client and the catalog fetcher
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Published CSV endpoint; `None` means only fallbacks are available
    pub source_url: Option<String>,
    /// Optional CORS-relaxing proxy that takes the source as a `url` parameter
    pub proxy_url: Option<String>,
    /// How long a live fetch stays fresh
    pub ttl: Duration,
    /// How long fallback data is reused before the sheet is retried
    pub degraded_ttl: Duration,
    /// Upper bound on a single remote fetch
    pub timeout: Duration,
    /// Number of records the synthetic generator produces
    pub synthetic_count: usize,
    /// Number of leading synthetic records marked featured
    pub featured_count: usize,
    /// Seed for reproducible synthetic data
    pub synthetic_seed: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            proxy_url: None,
            ttl: Duration::from_secs(300),         // 5 minutes
            degraded_ttl: Duration::from_secs(30), // retry the sheet after 30 seconds
            timeout: Duration::from_secs(15),
            synthetic_count: 20,
            featured_count: 5,
            synthetic_seed: None,
        }
    }
}

impl CatalogConfig {
    /// Creates a config pointing at the CSV export of a published Google Sheet
    pub fn for_sheet(sheet_id: &str) -> Self {
        Self {
            source_url: Some(sheet_export_url(sheet_id)),
            ..Default::default()
        }
    }
}

/// Builds the CSV export URL for the first tab of a sheet
pub fn sheet_export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv&gid=0")
}
