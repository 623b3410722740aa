//! Command-line interface parsing for storecat
//!
//! This module handles parsing of CLI arguments using clap and turns the
//! global options into a `CatalogConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::catalog::Selection;
use crate::config::{sheet_export_url, CatalogConfig};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// Both a sheet id and an explicit source URL were given
    #[error("Use either --sheet-id or --source-url, not both")]
    ConflictingSource,

    /// A duration option was zero where a positive value is required
    #[error("Invalid value for --{0}: must be greater than zero")]
    ZeroDuration(&'static str),
}

/// storecat - Browse a spreadsheet-published storefront catalog and manage a local cart
#[derive(Parser, Debug)]
#[command(name = "storecat")]
#[command(about = "Storefront catalog from a published spreadsheet, with caching and a local cart")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Id of the published Google Sheet holding the catalog
    #[arg(long, global = true, env = "STORECAT_SHEET_ID")]
    pub sheet_id: Option<String>,

    /// Full URL of a CSV catalog endpoint (instead of --sheet-id)
    #[arg(long, global = true, env = "STORECAT_SOURCE_URL")]
    pub source_url: Option<String>,

    /// Proxy that fetches the source on our behalf, e.g. https://api.allorigins.win/raw
    #[arg(long, global = true, env = "STORECAT_PROXY_URL")]
    pub proxy: Option<String>,

    /// Seconds a live catalog stays fresh
    #[arg(long, global = true, default_value_t = 300)]
    pub ttl_secs: u64,

    /// Seconds before a remote fetch is abandoned
    #[arg(long, global = true, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Directory for the catalog snapshot and cart (defaults to the XDG data dir)
    #[arg(long, global = true, env = "STORECAT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seed for placeholder data when no catalog is reachable
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List products, optionally narrowed by category or search text
    Products {
        /// Only products in this category
        #[arg(long, conflicts_with = "search")]
        category: Option<String>,
        /// Only products whose name, description or category contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List featured products
    Featured,
    /// List product categories
    Categories,
    /// Show one product
    Show {
        /// Product id
        id: u64,
    },
    /// Delete the cached catalog and its persisted snapshot
    ClearCache,
    /// Fetch the catalog now, bypassing the in-memory cache
    Refresh,
    /// Keep refreshing the catalog and report each pass
    Watch {
        /// Seconds between refresh passes
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
    },
    /// Manage the shopping cart
    #[command(subcommand)]
    Cart(CartCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add units of a product
    Add {
        product_id: u64,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove a product
    Remove { product_id: u64 },
    /// Set a product's quantity; zero or less removes it
    Set {
        product_id: u64,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Empty the cart
    Clear,
    /// Show cart contents and total
    List,
    /// Print a plain-text order summary
    Summary,
}

impl Command {
    /// Selection implied by `products` options; other commands select everything
    pub fn selection(&self) -> Selection {
        match self {
            Command::Products {
                category: Some(category),
                ..
            } => Selection::Category(category.clone()),
            Command::Products {
                search: Some(search),
                ..
            } => Selection::Search(search.clone()),
            _ => Selection::All,
        }
    }
}

impl GlobalArgs {
    /// Builds the catalog configuration from the global options
    ///
    /// # Returns
    /// * `Ok(CatalogConfig)` with the requested source, proxy and timings
    /// * `Err(CliError)` if the options contradict each other
    pub fn catalog_config(&self) -> Result<CatalogConfig, CliError> {
        let source_url = match (&self.sheet_id, &self.source_url) {
            (Some(_), Some(_)) => return Err(CliError::ConflictingSource),
            (Some(sheet_id), None) => Some(sheet_export_url(sheet_id)),
            (None, url) => url.clone(),
        };
        if self.ttl_secs == 0 {
            return Err(CliError::ZeroDuration("ttl-secs"));
        }
        if self.timeout_secs == 0 {
            return Err(CliError::ZeroDuration("timeout-secs"));
        }

        Ok(CatalogConfig {
            source_url,
            proxy_url: self.proxy.clone(),
            ttl: Duration::from_secs(self.ttl_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            synthetic_seed: self.seed,
            ..Default::default()
        })
    }
}
