//! Integration tests for order creation, numbering and status transitions.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use clothing_drop_core::{OrderStatus, ProductId};
use clothing_drop_storefront::models::OrderLineItem;
use clothing_drop_storefront::services::{
    InitialStatusPolicy, OrderError, OrderManager, OrderSettings, derive_timeline,
};
use clothing_drop_storefront::storage::MemoryStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;
use rust_decimal::Decimal;

fn line(id: i32, cents: i64, quantity: u32) -> OrderLineItem {
    OrderLineItem {
        product_id: ProductId::new(id),
        name: format!("Product {id}"),
        unit_price: Decimal::new(cents, 2),
        image_ref: String::new(),
        size: "M".to_owned(),
        quantity,
        category: "Traditional Shirts".to_owned(),
    }
}

fn manager(policy: InitialStatusPolicy) -> OrderManager {
    let settings = OrderSettings {
        initial_status: policy,
        ..OrderSettings::default()
    };
    OrderManager::init(Arc::new(MemoryStore::new()), settings).with_rng(StdRng::seed_from_u64(42))
}

// =============================================================================
// Creation
// =============================================================================

#[test]
fn test_subtotal_and_total() {
    let mut orders = manager(InitialStatusPolicy::DemoRandom);
    let number = orders.create_order(&[line(1, 54999, 2), line(2, 164_999, 1)], None);

    let order = orders.get(number.as_str()).expect("order recorded");
    assert_eq!(order.subtotal, Decimal::new(274_997, 2));
    assert_eq!(order.total, Decimal::new(284_996, 2));
    assert_eq!(order.total, order.subtotal + order.delivery_fee);
    assert_eq!(order.item_count(), 3);
}

#[test]
fn test_order_numbers_are_well_formed_and_unique() {
    let pattern = Regex::new(r"^CD-\d{8}-\d{3}$").expect("valid regex");
    let mut orders = manager(InitialStatusPolicy::DemoRandom);

    let mut seen = HashSet::new();
    for _ in 0..25 {
        let number = orders.create_order(&[line(1, 10000, 1)], None);
        assert!(pattern.is_match(number.as_str()), "{number}");
        assert!(seen.insert(number.into_inner()));
    }
}

#[test]
fn test_demo_seeding_is_never_terminal() {
    let mut orders = manager(InitialStatusPolicy::DemoRandom);
    for _ in 0..30 {
        let number = orders.create_order(&[line(1, 10000, 1)], None);
        let status = orders.get(number.as_str()).expect("order recorded").status;
        assert!(!status.is_terminal());
        assert_ne!(status, OrderStatus::Pending);
    }
}

#[test]
fn test_fixed_policy_is_deterministic() {
    let mut orders = manager(InitialStatusPolicy::Fixed(OrderStatus::Confirmed));
    let number = orders.create_order(&[line(1, 10000, 1)], None);
    assert_eq!(
        orders.get(number.as_str()).expect("order recorded").status,
        OrderStatus::Confirmed
    );
}

// =============================================================================
// Status Transitions
// =============================================================================

#[test]
fn test_walk_through_fulfillment() {
    let mut orders = manager(InitialStatusPolicy::Fixed(OrderStatus::Pending));
    let number = orders.create_order(&[line(1, 10000, 1)], None);

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ] {
        let order = orders
            .update_status(number.as_str(), status)
            .expect("forward move allowed");
        assert_eq!(order.status, status);
    }

    let err = orders
        .update_status(number.as_str(), OrderStatus::Cancelled)
        .expect_err("delivered is terminal");
    assert!(matches!(err, OrderError::IllegalTransition(_)));
}

#[test]
fn test_delivered_to_pending_rejected() {
    let mut orders = manager(InitialStatusPolicy::Fixed(OrderStatus::InTransit));
    let number = orders.create_order(&[line(1, 10000, 1)], None);
    orders
        .update_status(number.as_str(), OrderStatus::Delivered)
        .expect("in transit may be delivered");

    let before = orders.get(number.as_str()).cloned();
    assert!(
        orders
            .update_status(number.as_str(), OrderStatus::Pending)
            .is_err()
    );
    assert_eq!(orders.get(number.as_str()).cloned(), before);
}

#[test]
fn test_cancel_collapses_timeline() {
    let mut orders = manager(InitialStatusPolicy::Fixed(OrderStatus::Preparing));
    let number = orders.create_order(&[line(1, 10000, 1)], None);

    let order = orders
        .update_status(number.as_str(), OrderStatus::Cancelled)
        .expect("preparing may be cancelled");
    let labels: Vec<&str> = order.timeline.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Order Placed", "Delivered"]);
}

// =============================================================================
// Timeline
// =============================================================================

#[test]
fn test_timeline_is_idempotent() {
    let sast = FixedOffset::east_opt(7200).expect("valid offset");
    let created = Utc::now().with_timezone(&sast);
    let eta = created + TimeDelta::minutes(50);
    for status in OrderStatus::ALL {
        assert_eq!(
            derive_timeline(status, &created, Some(&eta)),
            derive_timeline(status, &created, Some(&eta))
        );
    }
}

#[test]
fn test_stored_timeline_matches_derivation() {
    let created: DateTime<Utc> = DateTime::parse_from_rfc3339("2025-09-24T08:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc);
    let mut orders = manager(InitialStatusPolicy::Fixed(OrderStatus::InTransit));
    let number = orders.create_order_at(&[line(1, 10000, 1)], None, created);
    let order = orders.get(number.as_str()).expect("order recorded");

    let times: Vec<&str> = order
        .timeline
        .iter()
        .map(|s| s.display_time.as_str())
        .collect();
    assert_eq!(
        times,
        ["10:00 AM", "10:02 AM", "10:05 AM", "10:15 AM", "Est. 10:45 AM"]
    );
    assert_eq!(order.timeline[3].current, Some(true));
}
