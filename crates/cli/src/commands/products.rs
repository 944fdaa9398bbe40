//! Catalog browsing commands.

use clothing_drop_core::{PriceDisplay, ProductId, ZAR_PRICE_BANDS, price_range};
use clothing_drop_storefront::catalog::ProductFilter;
use clothing_drop_storefront::models::Product;
use clothing_drop_storefront::{Result, Storefront};

/// List products matching `filter`.
pub fn list(storefront: &Storefront, filter: ProductFilter) {
    let products = storefront.catalog().list(&filter);
    if products.is_empty() {
        tracing::info!("No products match");
        return;
    }
    let currency = storefront.config().currency;
    for product in &products {
        tracing::info!("{}", summary(storefront, product));
    }
    if let Some(range) = price_range(products.iter().map(|p| &p.pricing), currency) {
        tracing::info!("{} products, {range}", products.len());
    }
}

/// List the price filter bands accepted by `products list --band`.
pub fn bands() {
    for (index, band) in ZAR_PRICE_BANDS.iter().enumerate() {
        tracing::info!("{}: {}", index + 1, band.label);
    }
}

/// Show one product in detail.
pub fn show(storefront: &Storefront, id: i32) -> Result<()> {
    let product = storefront.product(ProductId::new(id))?;
    tracing::info!("{}", summary(storefront, product));
    tracing::info!("  {}", product.description);
    tracing::info!("  Category: {}", product.category);
    tracing::info!("  Sizes: {}", product.sizes.join(", "));
    tracing::info!(
        "  {}",
        if product.in_stock {
            "In stock"
        } else {
            "Out of stock"
        }
    );
    Ok(())
}

/// List catalog categories.
pub fn categories(storefront: &Storefront) {
    let catalog = storefront.catalog();
    let currency = storefront.config().currency;
    for category in catalog.categories() {
        let range = catalog
            .price_range(Some(category), currency)
            .unwrap_or_default();
        tracing::info!("{category} ({range})");
    }
}

fn summary(storefront: &Storefront, product: &Product) -> String {
    let price = PriceDisplay::for_item(&product.pricing, storefront.config().currency);
    let was = price
        .original_price
        .map(|original| format!(" (was {original})"))
        .unwrap_or_default();
    let badge = product
        .pricing
        .sale_badge()
        .map(|badge| format!(" {badge}"))
        .unwrap_or_default();
    format!(
        "[{}] {} {}{was}{badge}",
        product.id, product.name, price.current_price
    )
}
