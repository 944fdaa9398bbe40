//! Integration tests for the cart store.
//!
//! These exercise the cart through its public API against both storage
//! backends, including reload from a fresh session.

use std::sync::Arc;

use clothing_drop_core::{CurrencyCode, ProductId};
use clothing_drop_storefront::Storefront;
use clothing_drop_storefront::catalog::Catalog;
use clothing_drop_storefront::config::StorefrontConfig;
use clothing_drop_storefront::services::CartStore;
use clothing_drop_storefront::storage::{CART_KEY, FileStore, KeyValueStore, MemoryStore};
use rust_decimal::Decimal;

fn memory() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

// =============================================================================
// Quantity Invariants
// =============================================================================

#[test]
fn test_item_count_matches_line_quantities() {
    let catalog = Catalog::demo();
    let mut cart = CartStore::init(memory());

    let shirt = catalog.get(ProductId::new(3)).expect("shirt exists");
    let hat = catalog.get(ProductId::new(4)).expect("hat exists");

    cart.add_item(shirt, "M", 2);
    assert_eq!(cart.item_count(), 1, "new lines start at one");
    cart.add_item(hat, "One Size", 1);
    cart.update_quantity(ProductId::new(3), "M", 5);
    cart.add_item(shirt, "L", 1);
    cart.remove_item(ProductId::new(4), "One Size");
    cart.update_quantity(ProductId::new(3), "L", 0);
    cart.add_item(hat, "One Size", 2);

    let expected: u32 = cart.items().iter().map(|line| line.quantity).sum();
    assert_eq!(cart.item_count(), expected);
    assert_eq!(cart.item_count(), 6);
    assert!(cart.items().iter().all(|line| line.quantity > 0));
}

#[test]
fn test_repeated_add_merges_lines() {
    let catalog = Catalog::demo();
    let mut cart = CartStore::init(memory());
    let dress = catalog.get(ProductId::new(1)).expect("dress exists");

    cart.add_item(dress, "M", 1);
    cart.add_item(dress, "M", 1);

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
    assert!(cart.contains(ProductId::new(1), "M"));

    cart.add_item(dress, "M", 3);
    assert_eq!(cart.items()[0].quantity, 5);
}

#[test]
fn test_clear_resets_count() {
    let catalog = Catalog::demo();
    let mut cart = CartStore::init(memory());
    for product in catalog.featured() {
        cart.add_item(product, &product.sizes[0], 3);
    }
    assert!(cart.item_count() > 0);

    cart.clear();
    assert_eq!(cart.item_count(), 0);
    assert_eq!(cart.total(), Decimal::ZERO);
}

#[test]
fn test_cart_totals_include_sale_savings() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut storefront: Storefront = Storefront::init(StorefrontConfig::default(), storage, None);
    storefront
        .add_to_cart(ProductId::new(1), "M", 1)
        .expect("dress in stock");
    storefront
        .add_to_cart(ProductId::new(1), "M", 1)
        .expect("dress in stock");
    storefront
        .add_to_cart(ProductId::new(3), "L", 1)
        .expect("shirt in stock");

    let totals = storefront.cart_totals();
    assert_eq!(totals.subtotal, storefront.cart().total());
    // 2 x (1199.99 - 899.99), shirt is full price
    assert_eq!(totals.total_savings, Decimal::new(60000, 2));
    assert_eq!(totals.item_count, 3);
    assert_eq!(totals.savings_display(CurrencyCode::ZAR), "R600.00");
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_cart_survives_reload() {
    let dir = tempfile::tempdir().expect("temp dir");
    let catalog = Catalog::demo();

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let mut cart = CartStore::init(Arc::clone(&storage));
    cart.add_item(catalog.get(ProductId::new(2)).expect("necklace"), "One Size", 1);
    cart.add_item(catalog.get(ProductId::new(6)).expect("sandals"), "9", 2);
    let before = cart.items().to_vec();
    drop(cart);

    let reloaded = CartStore::init(Arc::new(FileStore::new(dir.path())));
    assert_eq!(reloaded.items(), before.as_slice());
}

#[test]
fn test_corrupt_cart_loads_empty() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .set(CART_KEY, "{\"definitely\": not json")
        .expect("write raw payload");

    let cart = CartStore::init(storage);
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
}

#[test]
fn test_wrong_shape_cart_loads_empty() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .set(CART_KEY, "{\"items\": []}")
        .expect("write raw payload");

    assert!(CartStore::init(storage).is_empty());
}
