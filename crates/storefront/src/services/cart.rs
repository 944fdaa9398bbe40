//! Shopper cart store.
//!
//! Holds the cart lines keyed by `(product_id, size)` and writes the full list
//! to [`CART_KEY`] after every mutation. A failed write is logged and the
//! in-memory cart is kept as is.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use clothing_drop_core::ProductId;

use crate::models::{CartLineItem, OrderLineItem, Product};
use crate::storage::{CART_KEY, KeyValueStore, StorageError, read_json, write_json};

/// The shopper's cart.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    items: Vec<CartLineItem>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the persisted cart.
    ///
    /// Missing or malformed data yields an empty cart. Lines with zero
    /// quantity are dropped and duplicate `(product_id, size)` lines merged.
    pub fn init(storage: Arc<dyn KeyValueStore>) -> Self {
        let loaded = match read_json::<Vec<CartLineItem>>(storage.as_ref(), CART_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart");
                Vec::new()
            }
        };

        let mut cart = Self {
            storage,
            items: Vec::with_capacity(loaded.len()),
        };
        for line in loaded.into_iter().filter(|line| line.quantity > 0) {
            cart.merge(line);
        }
        cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Add `product` in `size`.
    ///
    /// An existing line for the same product and size grows by `quantity`;
    /// otherwise a new line is appended with quantity 1. A zero quantity is
    /// ignored.
    pub fn add_item(&mut self, product: &Product, size: &str, quantity: u32) {
        self.add_line(CartLineItem::from_product(product, size, quantity));
    }

    /// [`add_item`](Self::add_item) for a prebuilt line; `line.quantity` is
    /// the increment.
    pub fn add_line(&mut self, mut line: CartLineItem) {
        if line.quantity == 0 {
            return;
        }
        debug!(product_id = %line.product_id, size = %line.size, quantity = line.quantity, "Adding to cart");
        match self
            .items
            .iter_mut()
            .find(|existing| existing.matches(line.product_id, &line.size))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => {
                line.quantity = 1;
                self.items.push(line);
            }
        }
        self.persist();
    }

    /// Set a line's quantity exactly. Zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, size: &str, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            if quantity <= 0 {
                self.remove_item(product_id, size);
            } else {
                self.set_quantity(product_id, size, u32::MAX);
            }
            return;
        };
        if quantity == 0 {
            self.remove_item(product_id, size);
        } else {
            self.set_quantity(product_id, size, quantity);
        }
    }

    /// Remove the line for `product_id` in `size`, if present.
    pub fn remove_item(&mut self, product_id: ProductId, size: &str) {
        let before = self.items.len();
        self.items.retain(|line| !line.matches(product_id, size));
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total quantity across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId, size: &str) -> bool {
        self.items.iter().any(|line| line.matches(product_id, size))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Immutable copy of the lines for an order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OrderLineItem> {
        self.items.iter().map(OrderLineItem::from).collect()
    }

    /// Write the cart to storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn flush(&self) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), CART_KEY, &self.items)
    }

    /// Fold a loaded line into the list, summing duplicate quantities.
    fn merge(&mut self, line: CartLineItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.matches(line.product_id, &line.size))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.items.push(line),
        }
    }

    fn set_quantity(&mut self, product_id: ProductId, size: &str, quantity: u32) {
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.matches(product_id, size))
        {
            line.quantity = quantity;
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clothing_drop_core::PricedItem;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            pricing: PricedItem::regular(Decimal::new(cents, 2)),
            image: format!("/images/{id}.jpg"),
            category: "Shirts".to_owned(),
            sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
            in_stock: true,
            featured: false,
        }
    }

    fn cart() -> CartStore {
        CartStore::init(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_new_line_starts_at_one() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_existing_line_grows_by_quantity() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 1);
        cart.add_item(&product(1, 54999), "M", 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_zero_quantity_add_ignored() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_sizes_are_separate_lines() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 1);
        cart.add_item(&product(1, 54999), "L", 1);
        assert_eq!(cart.items().len(), 2);
        assert!(cart.contains(ProductId::new(1), "L"));
        assert!(!cart.contains(ProductId::new(1), "S"));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 1);

        cart.update_quantity(ProductId::new(1), "M", 4);
        assert_eq!(cart.item_count(), 4);

        cart.update_quantity(ProductId::new(1), "M", -2);
        assert!(cart.is_empty());

        cart.update_quantity(ProductId::new(9), "M", 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 1);
        cart.remove_item(ProductId::new(1), "XL");
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_total() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 1);
        cart.add_item(&product(1, 54999), "M", 1);
        cart.add_item(&product(2, 164_999), "L", 1);
        assert_eq!(cart.total(), Decimal::new(274_997, 2));
    }

    #[test]
    fn test_load_drops_zero_and_merges_duplicates() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(
                CART_KEY,
                r#"[
                    {"productId":1,"name":"A","unitPrice":"10.00","imageRef":"","size":"M","quantity":1},
                    {"productId":1,"name":"A","unitPrice":"10.00","imageRef":"","size":"M","quantity":2},
                    {"productId":2,"name":"B","unitPrice":"5.00","imageRef":"","size":"S","quantity":0}
                ]"#,
            )
            .unwrap();
        let cart = CartStore::init(storage);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut cart = cart();
        cart.add_item(&product(1, 54999), "M", 1);
        cart.update_quantity(ProductId::new(1), "M", 2);
        let snapshot = cart.snapshot();
        cart.clear();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity, 2);
    }
}
