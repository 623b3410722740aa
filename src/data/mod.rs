//! Core data models for the storefront catalog
//!
//! This module contains the record types shared by the decoder, the
//! normalizer, the fetcher and the cart, plus the sources that produce them.

pub mod normalize;
pub mod rows;
pub mod sheet;
pub mod synthetic;

pub use normalize::{normalize, normalize_rows};
pub use rows::{decode, RawRow};
pub use sheet::{FetchError, SheetClient};
pub use synthetic::generate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One catalog item
///
/// Records are only ever built by normalization or by the synthetic
/// generator, so `id > 0` and a non-empty `name` always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Unique positive identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Category label, shared across records
    #[serde(default)]
    pub category: String,
    /// Price in the smallest currency unit
    #[serde(default)]
    pub price: u64,
    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,
    /// Image location, may be empty or a placeholder
    #[serde(default)]
    pub image_url: String,
    /// Units in stock
    #[serde(default)]
    pub stock: u64,
    /// Whether the item is highlighted on the storefront
    #[serde(default)]
    pub featured: bool,
    /// Sort hint carried through from the sheet
    #[serde(default)]
    pub popularity: u64,
    /// Sheet columns without a typed slot, kept as trimmed text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// A line in the shopping cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Id of the product this entry refers to
    pub product_id: u64,
    /// Number of units, always at least 1
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ProductRecord {
        ProductRecord {
            id: 1,
            name: "Widget".to_string(),
            category: "Tools".to_string(),
            price: 1000,
            description: String::new(),
            image_url: "https://example.com/w.png".to_string(),
            stock: 3,
            featured: true,
            popularity: 0,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_product_record_uses_camel_case_keys() {
        let json = serde_json::to_string(&widget()).expect("Failed to serialize record");

        assert!(json.contains("\"imageUrl\""));
        assert!(!json.contains("image_url"));
        assert!(!json.contains("\"extra\""), "Empty extras should be omitted");
    }

    #[test]
    fn test_product_record_tolerates_missing_optional_fields() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id": 7, "name": "Bare"}"#).expect("Should deserialize");

        assert_eq!(record.id, 7);
        assert_eq!(record.name, "Bare");
        assert_eq!(record.price, 0);
        assert!(!record.featured);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_cart_entry_wire_shape() {
        let entry = CartEntry {
            product_id: 5,
            quantity: 2,
        };

        let json = serde_json::to_string(&entry).expect("Failed to serialize entry");

        assert_eq!(json, r#"{"productId":5,"quantity":2}"#);
    }
}
