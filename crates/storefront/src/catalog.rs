//! Product catalog.
//!
//! In demo mode the catalog is a fixed list of South African traditional
//! clothing priced in ZAR.

use rust_decimal::Decimal;

use clothing_drop_core::{CurrencyCode, PriceBand, PricedItem, ProductId};

use crate::error::{AppError, Result};
use crate::models::Product;

/// Default page size for [`Catalog::list`].
pub const DEFAULT_LIMIT: usize = 50;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Price ordering for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

/// Listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category; `None` or `"All"` matches every category.
    pub category: Option<String>,
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    pub price_band: Option<PriceBand>,
    pub on_sale_only: bool,
    pub sort: Option<PriceSort>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            price_band: None,
            on_sale_only: false,
            sort: None,
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Read-only product source.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The demo catalog.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(demo_products())
    }

    /// Products matching `filter`, in catalog order unless sorted.
    #[must_use]
    pub fn list(&self, filter: &ProductFilter) -> Vec<&Product> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = filter
            .category
            .as_deref()
            .filter(|c| *c != ALL_CATEGORIES);

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| {
                search.as_deref().is_none_or(|needle| {
                    p.name.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                })
            })
            .filter(|p| {
                filter
                    .price_band
                    .is_none_or(|band| band.contains(p.pricing.price))
            })
            .filter(|p| !filter.on_sale_only || p.pricing.is_on_sale())
            .collect();

        match filter.sort {
            Some(PriceSort::Ascending) => matches.sort_by_key(|p| p.pricing.price),
            Some(PriceSort::Descending) => {
                matches.sort_by_key(|p| std::cmp::Reverse(p.pricing.price));
            }
            None => {}
        }

        matches
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect()
    }

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has this ID.
    pub fn get(&self, id: ProductId) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
    }

    /// Distinct categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Formatted price range of a category, or of every product for `None`
    /// or `"All"`. `None` when nothing matches.
    #[must_use]
    pub fn price_range(&self, category: Option<&str>, currency: CurrencyCode) -> Option<String> {
        let category = category.filter(|c| *c != ALL_CATEGORIES);
        clothing_drop_core::price_range(
            self.products
                .iter()
                .filter(|p| category.is_none_or(|c| p.category == c))
                .map(|p| &p.pricing),
            currency,
        )
    }

    /// Featured products.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }
}

fn sale(price: i64, original: i64, discount: i64, tag: &str) -> PricedItem {
    PricedItem {
        price: Decimal::new(price, 2),
        original_price: Some(Decimal::new(original, 2)),
        discount: Some(Decimal::from(discount)),
        on_sale: true,
        sale_tag: Some(tag.to_owned()),
    }
}

fn sizes(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_owned()).collect()
}

#[allow(clippy::too_many_lines)]
fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Traditional Shweshwe Dress".to_owned(),
            description: "Authentic Shweshwe fabric dress with intricate geometric patterns. \
                Handcrafted by local artisans in the Eastern Cape. Perfect for cultural \
                celebrations and special occasions."
                .to_owned(),
            pricing: sale(89999, 119_999, 25, "HERITAGE SALE"),
            image: "https://picsum.photos/400/400?random=1".to_owned(),
            category: "Traditional Dresses".to_owned(),
            sizes: sizes(&["S", "M", "L", "XL", "XXL"]),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new(2),
            name: "Ndebele Beaded Necklace".to_owned(),
            description: "Stunning handcrafted Ndebele beaded necklace featuring traditional \
                geometric patterns in vibrant colors. Each piece tells a unique cultural story."
                .to_owned(),
            pricing: sale(64999, 84999, 24, "ARTISAN SPECIAL"),
            image: "https://picsum.photos/400/400?random=2".to_owned(),
            category: "Accessories".to_owned(),
            sizes: sizes(&["One Size"]),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new(3),
            name: "Xhosa Traditional Shirt".to_owned(),
            description: "Elegant Xhosa traditional shirt with beautiful embroidered patterns. \
                Made from high-quality cotton and perfect for cultural events and formal occasions."
                .to_owned(),
            pricing: PricedItem::regular(Decimal::new(129_999, 2)),
            image: "https://picsum.photos/400/400?random=3".to_owned(),
            category: "Traditional Shirts".to_owned(),
            sizes: sizes(&["S", "M", "L", "XL", "XXL"]),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new(4),
            name: "Zulu Isicholo Hat".to_owned(),
            description: "Traditional Zulu married woman's hat (isicholo) made with authentic \
                materials. A symbol of respect and cultural pride, handcrafted by skilled artisans."
                .to_owned(),
            pricing: sale(159_999, 199_999, 20, "CULTURAL HERITAGE"),
            image: "https://picsum.photos/400/400?random=4".to_owned(),
            category: "Traditional Headwear".to_owned(),
            sizes: sizes(&["One Size"]),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new(5),
            name: "Sotho Traditional Blanket".to_owned(),
            description: "Authentic Basotho blanket with traditional patterns and colors. A \
                symbol of identity and warmth, perfect for ceremonies or as a cultural statement piece."
                .to_owned(),
            pricing: PricedItem::regular(Decimal::new(229_999, 2)),
            image: "https://picsum.photos/400/400?random=5".to_owned(),
            category: "Traditional Blankets".to_owned(),
            sizes: sizes(&["Standard"]),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new(6),
            name: "Venda Traditional Sandals".to_owned(),
            description: "Handcrafted Venda traditional leather sandals with beaded decorations. \
                Comfortable and durable, perfect for cultural events or everyday wear with \
                traditional attire."
                .to_owned(),
            pricing: sale(79999, 99999, 20, "HANDCRAFTED"),
            image: "https://picsum.photos/400/400?random=6".to_owned(),
            category: "Traditional Footwear".to_owned(),
            sizes: sizes(&["5", "6", "7", "8", "9", "10", "11"]),
            in_stock: true,
            featured: true,
        },
    ]
}
