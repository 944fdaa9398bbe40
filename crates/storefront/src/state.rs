//! Application state.
//!
//! [`Storefront`] owns the cart, the order history and the lookup facade.
//! It is created once by the top-level application with [`Storefront::init`]
//! and handed to consumers by reference; [`Storefront::dispose`] flushes both
//! stores before shutdown.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use clothing_drop_core::{Address, CartTotals, OrderStatus, PricedItem, ProductId};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::db::{InMemoryOrderRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::{Order, Product};
use crate::services::tracking::order_from_stored;
use crate::services::{
    CartStore, CheckoutReceipt, CheckoutRequest, OrderError, OrderManager, OrderTracker,
    place_order,
};
use crate::storage::KeyValueStore;

/// Shopper-session state.
pub struct Storefront<R = InMemoryOrderRepository> {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: CartStore,
    orders: OrderManager,
    tracker: OrderTracker<R>,
    repository: Option<Arc<R>>,
}

impl<R: OrderRepository> Storefront<R> {
    /// Load the cart and order history from `storage`.
    ///
    /// Without a repository, orders are only recorded locally and checkout
    /// is unavailable.
    pub fn init(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
        repository: Option<Arc<R>>,
    ) -> Self {
        let cart = CartStore::init(Arc::clone(&storage));
        let orders = OrderManager::init(storage, config.order_settings());
        let tracker = OrderTracker::new(repository.clone(), config.display_offset);

        info!(
            cart_lines = cart.items().len(),
            orders = orders.orders().len(),
            demo_mode = config.demo_mode,
            "Storefront initialized"
        );

        Self {
            config,
            catalog: Catalog::demo(),
            cart,
            orders,
            tracker,
            repository,
        }
    }

    /// Replace the product catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the order manager (e.g. with a seeded random source).
    #[must_use]
    pub fn with_orders(mut self, orders: OrderManager) -> Self {
        self.orders = orders;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderManager {
        &self.orders
    }

    pub const fn orders_mut(&mut self) -> &mut OrderManager {
        &mut self.orders
    }

    #[must_use]
    pub const fn tracker(&self) -> &OrderTracker<R> {
        &self.tracker
    }

    /// Look up a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown ID.
    pub fn product(&self, id: ProductId) -> Result<&Product> {
        self.catalog.get(id)
    }

    /// Add a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product and
    /// `AppError::Validation` for a size the product is not offered in.
    pub fn add_to_cart(&mut self, id: ProductId, size: &str, quantity: u32) -> Result<()> {
        let product = self.catalog.get(id)?;
        if !product.offers_size(size) {
            return Err(AppError::Validation(format!(
                "{} is not available in size {size}",
                product.name
            )));
        }
        self.cart.add_item(product, size, quantity);
        Ok(())
    }

    /// Record the cart as a local order and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the cart is empty.
    #[instrument(skip(self, delivery_address))]
    pub fn place_local_order(&mut self, delivery_address: Option<Address>) -> Result<Order> {
        if self.cart.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_owned()));
        }
        let number = self
            .orders
            .create_order(&self.cart.snapshot(), delivery_address);
        self.cart.clear();
        self.orders
            .get(number.as_str())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Order {number}")))
    }

    /// Cart totals including sale savings, priced from the catalog.
    ///
    /// A line whose product is gone or repriced counts at its cart price with
    /// no savings.
    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        let priced: Vec<(PricedItem, u32)> = self
            .cart
            .items()
            .iter()
            .map(|line| {
                let pricing = self
                    .catalog
                    .get(line.product_id)
                    .ok()
                    .filter(|product| product.pricing.price == line.unit_price)
                    .map_or_else(
                        || PricedItem::regular(line.unit_price),
                        |product| product.pricing.clone(),
                    );
                (pricing, line.quantity)
            })
            .collect();
        CartTotals::calculate(priced.iter().map(|(pricing, quantity)| (pricing, *quantity)))
    }

    /// Place the cart through the external repository.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an incomplete request or when no
    /// repository is configured, and `AppError::ExternalService` if the
    /// repository fails.
    pub async fn checkout(
        &mut self,
        customer_id: Option<String>,
        delivery_address: Option<Address>,
    ) -> Result<CheckoutReceipt> {
        let Some(repository) = self.repository.clone() else {
            return Err(AppError::Validation(
                "No order service configured".to_owned(),
            ));
        };
        let request = CheckoutRequest::from_cart(
            &self.cart,
            customer_id,
            delivery_address,
            self.orders.settings().delivery_fee,
        );
        place_order(
            repository.as_ref(),
            &mut self.cart,
            &mut self.orders,
            request,
            Utc::now(),
        )
        .await
    }

    /// Resolve an order number against local history, then the repository.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no store knows the number.
    pub async fn find_order(&self, order_number: &str) -> Result<Order> {
        self.tracker.get_order(&self.orders, order_number).await
    }

    /// Most recently created local order.
    #[must_use]
    pub fn latest_order(&self) -> Option<&Order> {
        self.orders.latest()
    }

    /// Apply a status change to an order.
    ///
    /// Local orders are updated in place and mirrored to the repository; a
    /// failed mirror is logged only. Orders known only to the repository are
    /// validated against their stored status and updated there.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no store knows the number,
    /// `AppError::IllegalTransition` if the move is not allowed, and
    /// `AppError::ExternalService` if a repository-only update fails.
    pub async fn update_status(&mut self, order_number: &str, status: OrderStatus) -> Result<Order> {
        let local = self
            .orders
            .update_status(order_number, status)
            .cloned();

        let order = match local {
            Ok(order) => {
                if let Some(repository) = &self.repository
                    && let Err(e) = repository.update_status(order.id, status).await
                {
                    warn!(error = %e, order_number, "Failed to mirror status to order service");
                }
                order
            }
            Err(OrderError::NotFound(_)) if self.repository.is_some() => {
                self.update_external_status(order_number, status).await?
            }
            Err(e) => return Err(e.into()),
        };
        self.tracker.invalidate(order_number).await;

        Ok(order)
    }

    async fn update_external_status(&self, order_number: &str, status: OrderStatus) -> Result<Order> {
        let not_found = || AppError::NotFound(format!("Order {order_number}"));
        let repository = self.repository.as_ref().ok_or_else(not_found)?;
        let stored = repository
            .find_by_number(order_number)
            .await?
            .ok_or_else(not_found)?;

        let previous = stored.status;
        previous.transition_to(status)?;
        let updated = repository.update_status(stored.id, status).await?;
        info!(order_number, from = %previous, to = %status, "Order service status updated");

        Ok(order_from_stored(updated, &self.config.display_offset))
    }

    /// Flush the cart and order history.
    ///
    /// Write failures are logged; shutdown proceeds regardless.
    pub fn dispose(self) {
        if let Err(e) = self.cart.flush() {
            warn!(error = %e, "Failed to flush cart on shutdown");
        }
        if let Err(e) = self.orders.flush() {
            warn!(error = %e, "Failed to flush order history on shutdown");
        }
        info!("Storefront disposed");
    }
}
