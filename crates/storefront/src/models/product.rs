//! Catalog product record.

use serde::{Deserialize, Serialize};

use clothing_drop_core::{PricedItem, ProductId};

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub pricing: PricedItem,
    pub image: String,
    pub category: String,
    pub sizes: Vec<String>,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// True when `size` is one of the sizes this product is offered in.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.eq_ignore_ascii_case(size))
    }
}
