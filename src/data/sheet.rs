//! HTTP client for the published catalog sheet
//!
//! Fetches the CSV export (optionally through a proxy that forwards the raw
//! text) and turns it into normalized product records.

use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use super::{decode, normalize_rows, ProductRecord};
use crate::config::CatalogConfig;

/// Marker that proxies and the sheet endpoint put in failure bodies
const UPSTREAM_ERROR_MARKER: &str = "error";

/// Errors that can occur when fetching the remote catalog
#[derive(Debug, Error)]
pub enum FetchError {
    /// No source URL has been configured
    #[error("No catalog source configured")]
    NotConfigured,

    /// The source or proxy URL could not be parsed
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout
    #[error("Catalog request timed out")]
    Timeout,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The body is an upstream error message rather than catalog data
    #[error("Upstream returned an error body")]
    UpstreamError,

    /// The payload decoded to zero valid records
    #[error("Catalog payload contained no valid records")]
    Empty,
}

/// Client for the published CSV catalog
#[derive(Debug, Clone)]
pub struct SheetClient {
    /// HTTP client carrying the request timeout
    http_client: Client,
    /// Published CSV endpoint
    source_url: Option<String>,
    /// Proxy endpoint, if requests should go through one
    proxy_url: Option<String>,
}

impl SheetClient {
    /// Creates a client with the timeout and endpoints from `config`
    ///
    /// # Errors
    /// Returns `FetchError::HttpError` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            source_url: config.source_url.clone(),
            proxy_url: config.proxy_url.clone(),
        })
    }

    /// Returns the URL that will actually be requested
    ///
    /// With a proxy configured the source is passed as the proxy's `url`
    /// query parameter.
    pub fn request_url(&self) -> Result<Url, FetchError> {
        let source = self.source_url.as_deref().ok_or(FetchError::NotConfigured)?;

        let url = match self.proxy_url.as_deref() {
            Some(proxy) => Url::parse_with_params(proxy, &[("url", source)]),
            None => Url::parse(source),
        };
        url.map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Fetches the raw CSV text
    ///
    /// # Errors
    /// Fails on network errors, timeouts, non-success statuses, and bodies
    /// that carry an upstream error message.
    pub async fn fetch_text(&self) -> Result<String, FetchError> {
        let url = self.request_url()?;
        debug!(%url, "requesting catalog");

        let response = self.http_client.get(url).send().await.map_err(timeout_aware)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(timeout_aware)?;
        if text.contains(UPSTREAM_ERROR_MARKER) {
            return Err(FetchError::UpstreamError);
        }
        Ok(text)
    }

    /// Fetches and normalizes the catalog
    ///
    /// # Errors
    /// Everything `fetch_text` reports, plus `FetchError::Empty` when no row
    /// survives normalization.
    pub async fn fetch_records(&self) -> Result<Vec<ProductRecord>, FetchError> {
        let text = self.fetch_text().await?;
        let records = normalize_rows(&decode(&text));
        if records.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(records)
    }
}

fn timeout_aware(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::HttpError(error)
    }
}
