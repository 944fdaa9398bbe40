//! Integration tests for order lookup and delivery estimates.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use clothing_drop_core::{Address, OrderNumber, OrderStatus, ProductId};
use clothing_drop_storefront::config::StorefrontConfig;
use clothing_drop_storefront::db::{InMemoryOrderRepository, NewOrder, OrderRepository};
use clothing_drop_storefront::services::{DeliveryEstimate, estimate_remaining};
use clothing_drop_storefront::storage::{KeyValueStore, MemoryStore};
use clothing_drop_storefront::{AppError, Storefront};
use rust_decimal::Decimal;

fn local_storefront() -> Storefront {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = StorefrontConfig {
        demo_mode: false,
        ..StorefrontConfig::default()
    };
    Storefront::init(config, storage, None)
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_local_lookup_and_latest() {
    let mut storefront = local_storefront();
    assert!(storefront.latest_order().is_none());

    storefront
        .add_to_cart(ProductId::new(5), "Standard", 1)
        .expect("blanket in stock");
    let first = storefront.place_local_order(None).expect("order placed");
    storefront
        .add_to_cart(ProductId::new(4), "One Size", 1)
        .expect("hat in stock");
    let second = storefront.place_local_order(None).expect("order placed");

    let found = storefront
        .find_order(first.order_number.as_str())
        .await
        .expect("first order found");
    assert_eq!(found, first);
    assert_eq!(
        storefront.latest_order().map(|o| &o.order_number),
        Some(&second.order_number)
    );
    assert_eq!(second.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_unknown_number_not_found() {
    let storefront = local_storefront();
    let err = storefront
        .find_order("CD-20250101-001")
        .await
        .expect_err("no such order");
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

async fn seed_external(repository: &InMemoryOrderRepository, status: OrderStatus) -> OrderNumber {
    let created_at = Utc::now();
    let number = OrderNumber::compose(created_at.date_naive(), 42);
    repository
        .create_order(NewOrder {
            customer_id: "elsewhere".to_owned(),
            order_number: number.clone(),
            subtotal: Decimal::new(64999, 2),
            delivery_fee: Decimal::new(9999, 2),
            total: Decimal::new(74998, 2),
            status,
            delivery_address: Address::demo(),
            estimated_delivery: None,
            created_at,
        })
        .await
        .expect("seed external order");
    number
}

fn shared_storefront(repository: Arc<InMemoryOrderRepository>) -> Storefront {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    Storefront::init(StorefrontConfig::default(), storage, Some(repository))
}

#[tokio::test]
async fn test_external_fallback() {
    let repository = Arc::new(InMemoryOrderRepository::new());
    let number = seed_external(&repository, OrderStatus::Preparing).await;
    let storefront = shared_storefront(repository);

    let order = storefront
        .find_order(number.as_str())
        .await
        .expect("resolved externally");
    assert_eq!(order.status, OrderStatus::Preparing);
    assert_eq!(order.timeline.len(), 4);
    assert_eq!(order.estimated_delivery_label, "30-45 minutes");
}

#[tokio::test]
async fn test_status_update_through_storefront() {
    let mut storefront = local_storefront();
    storefront
        .add_to_cart(ProductId::new(1), "S", 1)
        .expect("dress in stock");
    let order = storefront.place_local_order(None).expect("order placed");

    let updated = storefront
        .update_status(order.order_number.as_str(), OrderStatus::InTransit)
        .await
        .expect("confirmed may ship");
    assert_eq!(updated.status, OrderStatus::InTransit);

    let err = storefront
        .update_status(order.order_number.as_str(), OrderStatus::Confirmed)
        .await
        .expect_err("cannot go backwards");
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_status_update_for_external_order() {
    let repository = Arc::new(InMemoryOrderRepository::new());
    let number = seed_external(&repository, OrderStatus::Preparing).await;
    let mut storefront = shared_storefront(Arc::clone(&repository));

    // warm the lookup cache so the update has to invalidate it
    storefront
        .find_order(number.as_str())
        .await
        .expect("resolved externally");

    let updated = storefront
        .update_status(number.as_str(), OrderStatus::InTransit)
        .await
        .expect("preparing may ship");
    assert_eq!(updated.status, OrderStatus::InTransit);
    assert!(storefront.orders().orders().is_empty());

    let stored = repository
        .find_by_number(number.as_str())
        .await
        .expect("lookup succeeds")
        .expect("order stored");
    assert_eq!(stored.status, OrderStatus::InTransit);

    let found = storefront
        .find_order(number.as_str())
        .await
        .expect("resolved externally");
    assert_eq!(found.status, OrderStatus::InTransit);

    let err = storefront
        .update_status(number.as_str(), OrderStatus::Preparing)
        .await
        .expect_err("cannot go backwards");
    assert_eq!(err.status_code(), 409);

    let err = storefront
        .update_status("CD-20250101-001", OrderStatus::Delivered)
        .await
        .expect_err("unknown everywhere");
    assert_eq!(err.status_code(), 404);
}

// =============================================================================
// Estimates
// =============================================================================

#[tokio::test]
async fn test_estimate_boundaries() {
    let mut storefront = local_storefront();
    storefront
        .add_to_cart(ProductId::new(3), "M", 1)
        .expect("shirt in stock");
    let order = storefront.place_local_order(None).expect("order placed");
    let eta = order.estimated_delivery.expect("estimate recorded");

    assert_eq!(
        estimate_remaining(&order, eta - TimeDelta::minutes(15)),
        DeliveryEstimate::Minutes(15)
    );
    assert_eq!(
        estimate_remaining(&order, eta - TimeDelta::minutes(15))
            .to_string(),
        "15 minutes"
    );
    assert_eq!(
        estimate_remaining(&order, eta - TimeDelta::minutes(30)).to_string(),
        "15-30 minutes"
    );
    assert_eq!(
        estimate_remaining(&order, eta - TimeDelta::minutes(31)).to_string(),
        "30-45 minutes"
    );
    assert_eq!(
        estimate_remaining(&order, eta - TimeDelta::minutes(46)).to_string(),
        "45+ minutes"
    );
    assert_eq!(
        estimate_remaining(&order, eta + TimeDelta::minutes(1)).to_string(),
        "Arriving now"
    );
}
