//! Locally persisted shopping cart
//!
//! The cart is an ordered list of entries, unique by product id. Every
//! mutation is written to disk before it takes effect in memory, so the
//! in-memory cart and the stored cart never disagree.

use std::fmt::Write as _;

use tracing::warn;

use crate::catalog::query::by_id;
use crate::data::{CartEntry, ProductRecord};
use crate::store::{LocalStore, StorageError};

/// Key the cart is stored under
const CART_KEY: &str = "cart";

/// Owns the cart and its persistence
#[derive(Debug)]
pub struct CartStore {
    store: LocalStore,
    entries: Vec<CartEntry>,
}

impl CartStore {
    /// Loads the stored cart, starting empty if none is stored or it is unreadable
    pub fn load(store: LocalStore) -> Self {
        let entries = match store.read::<Vec<CartEntry>>(CART_KEY) {
            Ok(Some(entries)) => sanitize(entries),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "failed to read stored cart, starting empty");
                Vec::new()
            }
        };
        Self { store, entries }
    }

    /// Adds `quantity` units, accumulating onto an existing entry
    ///
    /// Adding zero units is a no-op.
    pub fn add(&mut self, product_id: u64, quantity: u32) -> Result<(), StorageError> {
        if quantity == 0 {
            return Ok(());
        }
        let mut next = self.entries.clone();
        match next.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => next.push(CartEntry {
                product_id,
                quantity,
            }),
        }
        self.commit(next)
    }

    pub fn remove(&mut self, product_id: u64) -> Result<(), StorageError> {
        let next = self
            .entries
            .iter()
            .copied()
            .filter(|e| e.product_id != product_id)
            .collect();
        self.commit(next)
    }

    /// Sets an entry's quantity; zero or below removes it
    ///
    /// Setting a product that is not in the cart adds it.
    pub fn set_quantity(&mut self, product_id: u64, quantity: i64) -> Result<(), StorageError> {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut next = self.entries.clone();
        match next.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity = quantity,
            None => next.push(CartEntry {
                product_id,
                quantity,
            }),
        }
        self.commit(next)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }

    pub fn list(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Total number of units across all entries
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of quantity times price; entries missing from `records` add nothing
    ///
    /// Saturates at `u64::MAX` rather than wrapping.
    pub fn total(&self, records: &[ProductRecord]) -> u64 {
        self.entries
            .iter()
            .filter_map(|e| by_id(records, e.product_id).map(|r| line_total(r, e)))
            .fold(0, u64::saturating_add)
    }

    /// Renders a plain-text order listing for the entries found in `records`
    pub fn order_summary(&self, records: &[ProductRecord]) -> String {
        let mut summary = String::from("Order:\n");
        for entry in &self.entries {
            let Some(record) = by_id(records, entry.product_id) else {
                continue;
            };
            let _ = writeln!(
                summary,
                "- {} x{} = {}",
                record.name,
                entry.quantity,
                format_price(line_total(record, entry))
            );
        }
        let _ = write!(summary, "Total: {}", format_price(self.total(records)));
        summary
    }

    fn commit(&mut self, next: Vec<CartEntry>) -> Result<(), StorageError> {
        self.store.write(CART_KEY, &next)?;
        self.entries = next;
        Ok(())
    }
}

fn line_total(record: &ProductRecord, entry: &CartEntry) -> u64 {
    record.price.saturating_mul(u64::from(entry.quantity))
}

/// Formats an amount in the smallest currency unit with thousands separators
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Drops zero-quantity entries and merges duplicates from hand-edited files
fn sanitize(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(entries.len());
    for entry in entries.into_iter().filter(|e| e.quantity > 0) {
        match merged.iter_mut().find(|m| m.product_id == entry.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
            None => merged.push(entry),
        }
    }
    merged
}
