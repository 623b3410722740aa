//! storecat library
//!
//! Catalog pipeline for a spreadsheet-backed storefront: decoding, caching,
//! fallback tiers, querying and the local cart. The binary and integration
//! tests build on these modules.

pub mod app;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod refresh;
pub mod store;
