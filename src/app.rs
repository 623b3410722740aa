//! Consumer-facing storefront state
//!
//! `Storefront` is built once at startup and owns the catalog fetcher, the
//! cart and the current product selection. Everything it returns is plain
//! data for whatever presentation layer sits on top.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{query, Catalog, CatalogFetcher, Selection};
use crate::data::{CartEntry, ProductRecord};
use crate::store::StorageError;

/// Application context for one storefront session
pub struct Storefront {
    fetcher: Arc<CatalogFetcher>,
    cart: CartStore,
    selection: Selection,
}

impl Storefront {
    pub fn new(fetcher: CatalogFetcher, cart: CartStore) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            cart,
            selection: Selection::All,
        }
    }

    /// Shared handle to the fetcher, e.g. for a background refresh task
    pub fn fetcher(&self) -> Arc<CatalogFetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Returns the current catalog with its provenance
    pub async fn catalog(&self) -> Catalog {
        self.fetcher.get_catalog().await
    }

    pub async fn get_products(&self) -> Vec<ProductRecord> {
        self.fetcher.get_products().await
    }

    pub async fn get_categories(&self) -> Vec<String> {
        let catalog = self.catalog().await;
        query::categories(&catalog.records)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub async fn get_featured_products(&self) -> Vec<ProductRecord> {
        let catalog = self.catalog().await;
        query::featured(&catalog.records).into_iter().cloned().collect()
    }

    pub async fn search_products(&self, text: &str) -> Vec<ProductRecord> {
        let catalog = self.catalog().await;
        query::search(&catalog.records, text).into_iter().cloned().collect()
    }

    pub async fn get_product_by_id(&self, id: u64) -> Option<ProductRecord> {
        let catalog = self.catalog().await;
        query::by_id(&catalog.records, id).cloned()
    }

    /// Products narrowed by the current selection
    pub async fn filtered_products(&self) -> Vec<ProductRecord> {
        let catalog = self.catalog().await;
        self.selection.apply(&catalog.records).into_iter().cloned().collect()
    }

    /// Current category or search narrowing
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the selection; a blank search selects everything
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = match selection {
            Selection::Search(text) if text.trim().is_empty() => Selection::All,
            other => other,
        };
    }

    /// Selects a category, clearing any search
    pub fn set_category(&mut self, category: Option<String>) {
        self.set_selection(category.map_or(Selection::All, Selection::Category));
    }

    /// Selects a search query, clearing any category
    pub fn set_search(&mut self, text: &str) {
        self.set_selection(Selection::Search(text.to_string()));
    }

    /// Drops the in-memory and persisted catalog caches
    pub fn clear_cache(&self) -> Result<(), StorageError> {
        self.fetcher.clear_cache()
    }

    /// Forces the next read to go back to the sheet and performs it
    pub async fn refresh(&self) -> Catalog {
        self.fetcher.invalidate();
        self.fetcher.get_catalog().await
    }

    pub fn add_to_cart(&mut self, product_id: u64, quantity: u32) -> Result<(), StorageError> {
        self.cart.add(product_id, quantity)
    }

    pub fn remove_from_cart(&mut self, product_id: u64) -> Result<(), StorageError> {
        self.cart.remove(product_id)
    }

    pub fn update_cart_quantity(&mut self, product_id: u64, quantity: i64) -> Result<(), StorageError> {
        self.cart.set_quantity(product_id, quantity)
    }

    pub fn clear_cart(&mut self) -> Result<(), StorageError> {
        self.cart.clear()
    }

    pub fn cart_entries(&self) -> &[CartEntry] {
        self.cart.list()
    }

    pub fn cart_item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Cart total priced against the current catalog
    pub async fn cart_total(&self) -> u64 {
        let catalog = self.catalog().await;
        self.cart.total(&catalog.records)
    }

    pub async fn order_summary(&self) -> String {
        let catalog = self.catalog().await;
        self.cart.order_summary(&catalog.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CacheState, CatalogOrigin};
    use crate::config::CatalogConfig;
    use crate::store::{LocalStore, SnapshotStore};
    use tempfile::TempDir;

    /// Storefront with no sheet configured, so reads serve seeded synthetic data
    fn offline_storefront() -> (Storefront, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = LocalStore::with_dir(temp_dir.path().to_path_buf());
        let config = CatalogConfig {
            synthetic_seed: Some(11),
            ..Default::default()
        };
        let fetcher = CatalogFetcher::new(config, Some(SnapshotStore::new(store.clone())), CacheState::new())
            .expect("Fetcher should build");
        (Storefront::new(fetcher, CartStore::load(store)), temp_dir)
    }

    #[tokio::test]
    async fn test_reads_never_come_back_empty() {
        let (storefront, _temp_dir) = offline_storefront();

        assert!(!storefront.get_products().await.is_empty());
        assert_eq!(storefront.catalog().await.origin, CatalogOrigin::Synthetic);
        assert_eq!(storefront.get_featured_products().await.len(), 5);
        assert!(!storefront.get_categories().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_product_by_id() {
        let (storefront, _temp_dir) = offline_storefront();

        let product = storefront.get_product_by_id(3).await.expect("Product 3 should exist");
        assert_eq!(product.id, 3);
        assert!(storefront.get_product_by_id(999).await.is_none());
    }

    #[tokio::test]
    async fn test_search_products_matches_synthetic_names() {
        let (storefront, _temp_dir) = offline_storefront();

        let results = storefront.search_products("sample 7").await;

        assert!(results.iter().any(|p| p.id == 7));
    }

    #[test]
    fn test_category_and_search_are_mutually_exclusive() {
        let (mut storefront, _temp_dir) = offline_storefront();

        storefront.set_category(Some("Cables".to_string()));
        assert_eq!(storefront.selection(), &Selection::Category("Cables".to_string()));

        storefront.set_search("usb");
        assert_eq!(storefront.selection(), &Selection::Search("usb".to_string()));

        storefront.set_category(Some("Chargers".to_string()));
        assert_eq!(storefront.selection(), &Selection::Category("Chargers".to_string()));

        storefront.set_search("  ");
        assert_eq!(storefront.selection(), &Selection::All);

        storefront.set_category(None);
        assert_eq!(storefront.selection(), &Selection::All);
    }

    #[test]
    fn test_set_selection_treats_blank_search_as_all() {
        let (mut storefront, _temp_dir) = offline_storefront();

        storefront.set_selection(Selection::Search(" \t".to_string()));
        assert_eq!(storefront.selection(), &Selection::All);

        storefront.set_selection(Selection::Category("Cables".to_string()));
        assert_eq!(storefront.selection(), &Selection::Category("Cables".to_string()));
    }

    #[tokio::test]
    async fn test_filtered_products_follow_selection() {
        let (mut storefront, _temp_dir) = offline_storefront();
        let category = storefront.get_categories().await.remove(0);

        storefront.set_category(Some(category.clone()));
        let filtered = storefront.filtered_products().await;

        assert!(!filtered.is_empty());
        assert!(filtered.iter().all(|p| p.category == category));
    }

    #[tokio::test]
    async fn test_cart_total_uses_catalog_prices() {
        let (mut storefront, _temp_dir) = offline_storefront();
        let product = storefront.get_product_by_id(2).await.unwrap();

        storefront.add_to_cart(2, 2).unwrap();
        storefront.add_to_cart(500, 1).unwrap();

        assert_eq!(storefront.cart_item_count(), 3);
        assert_eq!(storefront.cart_total().await, product.price * 2);

        storefront.update_cart_quantity(2, 0).unwrap();
        storefront.remove_from_cart(500).unwrap();
        assert!(storefront.cart_entries().is_empty());
    }

    #[tokio::test]
    async fn test_order_summary_names_products() {
        let (mut storefront, _temp_dir) = offline_storefront();
        let product = storefront.get_product_by_id(1).await.unwrap();
        storefront.add_to_cart(1, 1).unwrap();

        let summary = storefront.order_summary().await;

        assert!(summary.contains(&product.name));
        storefront.clear_cart().unwrap();
        assert_eq!(storefront.cart_item_count(), 0);
    }
}
