//! Checkout coordination.
//!
//! Places an order with the external repository, then records it locally and
//! clears the cart. Nothing is cleared until the repository has accepted both
//! the order row and its line items; a failed line-item insert deletes the
//! order row again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use clothing_drop_core::{Address, OrderId, OrderNumber};

use crate::db::{NewOrder, OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{Order, OrderLineItem};

use super::cart::CartStore;
use super::orders::OrderManager;

/// Order numbers tried before a conflict is reported.
pub const MAX_NUMBER_ATTEMPTS: u32 = 32;

/// Everything needed to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_id: Option<String>,
    pub items: Vec<OrderLineItem>,
    pub delivery_address: Option<Address>,
    /// Total the shopper was shown, including delivery.
    pub total: Option<Decimal>,
}

impl CheckoutRequest {
    /// Build a request from the current cart, quoting cart total plus `delivery_fee`.
    #[must_use]
    pub fn from_cart(
        cart: &CartStore,
        customer_id: Option<String>,
        delivery_address: Option<Address>,
        delivery_fee: Decimal,
    ) -> Self {
        Self {
            customer_id,
            items: cart.snapshot(),
            delivery_address,
            total: Some(cart.total() + delivery_fee),
        }
    }

    /// Check required fields and the quoted total.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the missing fields, the blank
    /// address fields, or the total mismatch.
    pub fn validate(&self, delivery_fee: Decimal) -> Result<()> {
        let mut missing = Vec::new();
        if self
            .customer_id
            .as_deref()
            .is_none_or(|id| id.trim().is_empty())
        {
            missing.push("customerId");
        }
        if self.items.is_empty() {
            missing.push("items");
        }
        if self.delivery_address.is_none() {
            missing.push("deliveryAddress");
        }
        if self.total.is_none() {
            missing.push("total");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if let Some(address) = &self.delivery_address {
            let blank = address.missing_fields();
            if !blank.is_empty() {
                return Err(AppError::Validation(format!(
                    "Incomplete delivery address: {}",
                    blank.join(", ")
                )));
            }
        }

        if let Some(line) = self.items.iter().find(|line| line.quantity == 0) {
            return Err(AppError::Validation(format!(
                "Line for product {} has zero quantity",
                line.product_id
            )));
        }

        let expected = Order::items_subtotal(&self.items) + delivery_fee;
        if let Some(quoted) = self.total
            && quoted != expected
        {
            return Err(AppError::Validation(format!(
                "Order total {quoted} does not match {expected}"
            )));
        }

        Ok(())
    }
}

/// Identifiers handed to the payment-success redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub order_number: OrderNumber,
    pub total: Decimal,
}

/// Place an order.
///
/// # Errors
///
/// Returns `AppError::Validation` before any external call if the request is
/// incomplete, or `AppError::ExternalService` if the repository fails or
/// every number up to [`MAX_NUMBER_ATTEMPTS`] is taken. The cart and local
/// history are untouched on error.
#[instrument(skip_all, fields(lines = request.items.len()))]
pub async fn place_order<R: OrderRepository>(
    repository: &R,
    cart: &mut CartStore,
    orders: &mut OrderManager,
    request: CheckoutRequest,
    now: DateTime<Utc>,
) -> Result<CheckoutReceipt> {
    request.validate(orders.settings().delivery_fee)?;

    let CheckoutRequest {
        customer_id,
        items,
        delivery_address,
        ..
    } = request;

    let mut order = orders.prepare_order(&items, delivery_address, now);
    let customer_id = customer_id.unwrap_or_default();

    let mut attempts = 1;
    let stored = loop {
        match repository.create_order(new_order(&customer_id, &order)).await {
            Ok(stored) => break stored,
            Err(RepositoryError::Conflict(reason)) if attempts < MAX_NUMBER_ATTEMPTS => {
                warn!(order_number = %order.order_number, %reason, "Order number taken, renumbering");
                orders.renumber(&mut order);
                attempts += 1;
            }
            Err(e) => {
                error!(error = %e, attempts, "Order creation failed");
                return Err(e.into());
            }
        }
    };

    if let Err(e) = repository
        .insert_line_items(stored.id, &order.line_items)
        .await
    {
        error!(error = %e, order_id = %stored.id, "Line item insertion failed, deleting order");
        if let Err(cleanup) = repository.delete_order(stored.id).await {
            error!(error = %cleanup, order_id = %stored.id, "Failed to delete orphaned order");
        }
        return Err(e.into());
    }

    order.id = stored.id;
    let receipt = CheckoutReceipt {
        order_id: order.id,
        order_number: order.order_number.clone(),
        total: order.total,
    };

    orders.commit(order);
    cart.clear();

    info!(order_number = %receipt.order_number, "Checkout complete");
    Ok(receipt)
}

fn new_order(customer_id: &str, order: &Order) -> NewOrder {
    NewOrder {
        customer_id: customer_id.to_owned(),
        order_number: order.order_number.clone(),
        subtotal: order.subtotal,
        delivery_fee: order.delivery_fee,
        total: order.total,
        status: order.status,
        delivery_address: order.delivery_address.clone(),
        estimated_delivery: order.estimated_delivery,
        created_at: order.created_at,
    }
}
