//! Cart commands.

use clothing_drop_core::{ProductId, format_price};
use clothing_drop_storefront::{Result, Storefront};

/// Print cart lines and totals.
pub fn show(storefront: &Storefront) {
    let cart = storefront.cart();
    let currency = storefront.config().currency;

    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for line in cart.items() {
        tracing::info!(
            "[{}] {} ({}) x{} = {}",
            line.product_id,
            line.name,
            line.size,
            line.quantity,
            format_price(line.line_total(), currency)
        );
    }

    let totals = storefront.cart_totals();
    let fee = storefront.orders().settings().delivery_fee;
    tracing::info!("Items: {}", totals.item_count);
    tracing::info!("Subtotal: {}", totals.subtotal_display(currency));
    if !totals.total_savings.is_zero() {
        tracing::info!("You save: {}", totals.savings_display(currency));
    }
    tracing::info!("Delivery: {}", format_price(fee, currency));
    tracing::info!("Total: {}", format_price(totals.subtotal + fee, currency));
}

/// Add a catalog product to the cart.
pub fn add(storefront: &mut Storefront, id: i32, size: &str, quantity: u32) -> Result<()> {
    storefront.add_to_cart(ProductId::new(id), size, quantity)?;
    let line_quantity = storefront
        .cart()
        .items()
        .iter()
        .find(|line| line.matches(ProductId::new(id), size))
        .map_or(0, |line| line.quantity);
    tracing::info!(
        "Product {id} ({size}) x{line_quantity}; cart now holds {} items",
        storefront.cart().item_count()
    );
    Ok(())
}

/// Set a line's quantity.
pub fn update(storefront: &mut Storefront, id: i32, size: &str, quantity: i64) {
    storefront
        .cart_mut()
        .update_quantity(ProductId::new(id), size, quantity);
    tracing::info!("Cart now holds {} items", storefront.cart().item_count());
}

/// Remove a line.
pub fn remove(storefront: &mut Storefront, id: i32, size: &str) {
    storefront.cart_mut().remove_item(ProductId::new(id), size);
    tracing::info!("Cart now holds {} items", storefront.cart().item_count());
}

/// Empty the cart.
pub fn clear(storefront: &mut Storefront) {
    storefront.cart_mut().clear();
    tracing::info!("Cart cleared");
}
