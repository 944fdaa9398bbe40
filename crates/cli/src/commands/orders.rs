//! Order placement and tracking commands.

use chrono::Utc;
use clothing_drop_core::{OrderStatus, Price};
use clothing_drop_storefront::models::Order;
use clothing_drop_storefront::services::estimate_remaining;
use clothing_drop_storefront::{AppError, Result, Storefront};

/// Place the cart as a local order.
pub fn place(storefront: &mut Storefront) -> Result<()> {
    let order = storefront.place_local_order(None)?;
    tracing::info!(
        "Order {} placed: {} ({})",
        order.order_number,
        Price::new(order.total, storefront.config().currency),
        order.status.label()
    );
    tracing::info!("Estimated delivery: {}", order.estimated_delivery_label);
    Ok(())
}

/// List local orders, newest first.
pub fn list(storefront: &Storefront) {
    let orders = storefront.orders().orders();
    if orders.is_empty() {
        tracing::info!("No orders yet");
        return;
    }
    for order in orders {
        tracing::info!(
            "{} {} {} items {}",
            order.order_number,
            order.status.label(),
            order.item_count(),
            Price::new(order.total, storefront.config().currency)
        );
    }
}

/// Show an order's timeline and remaining delivery time.
pub async fn track(storefront: &Storefront, order_number: &str) -> Result<()> {
    let order = storefront.find_order(order_number).await?;
    print_tracking(storefront, &order);
    Ok(())
}

/// Show the most recent order.
pub fn latest(storefront: &Storefront) {
    match storefront.latest_order() {
        Some(order) => print_tracking(storefront, order),
        None => tracing::info!("No orders yet"),
    }
}

/// Move an order to a new status.
pub async fn update_status(
    storefront: &mut Storefront,
    order_number: &str,
    status: &str,
) -> Result<()> {
    let status: OrderStatus = status.parse().map_err(AppError::Validation)?;
    let order = storefront.update_status(order_number, status).await?;
    tracing::info!("Order {} is now {}", order.order_number, order.status.label());
    Ok(())
}

fn print_tracking(storefront: &Storefront, order: &Order) {
    tracing::info!(
        "Order {} - {} - {}",
        order.order_number,
        order.status.label(),
        Price::new(order.total, storefront.config().currency)
    );
    tracing::info!("Deliver to: {}", order.delivery_address);
    for step in &order.timeline {
        let marker = match (step.completed, step.current) {
            (_, Some(true)) => ">",
            (true, _) => "x",
            (false, _) => " ",
        };
        tracing::info!("  [{marker}] {} {}", step.label, step.display_time);
    }
    if !order.status.is_terminal() {
        tracing::info!("Arriving in: {}", estimate_remaining(order, Utc::now()));
    }
}
