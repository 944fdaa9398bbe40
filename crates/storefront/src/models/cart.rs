//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clothing_drop_core::ProductId;

use super::Product;

/// A (product, size, quantity) selection in the shopper's cart.
///
/// Identity is the `(product_id, size)` pair; a cart never holds two lines
/// with the same pair and never holds a line with zero quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    #[serde(alias = "image")]
    pub image_ref: String,
    pub size: String,
    pub quantity: u32,
    #[serde(default)]
    pub category: String,
}

impl CartLineItem {
    /// Build a line for `product` in `size`.
    #[must_use]
    pub fn from_product(product: &Product, size: &str, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.pricing.price,
            image_ref: product.image.clone(),
            size: size.to_owned(),
            quantity,
            category: product.category.clone(),
        }
    }

    /// True when this line is keyed by `(product_id, size)`.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
