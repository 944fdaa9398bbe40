//! Order lookup and delivery tracking.
//!
//! Resolves a shopper-supplied order number to display data. The local order
//! history is consulted first; orders placed elsewhere are fetched from the
//! external repository and cached for 5 minutes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::db::{OrderRepository, StoredOrder};
use crate::error::{AppError, Result};
use crate::models::Order;

use super::orders::OrderManager;
use super::timeline::{DELIVERY_WINDOW_MINUTES, derive_timeline_at};

/// Time left until an order arrives, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryEstimate {
    /// The estimate has passed.
    ArrivingNow,
    /// 1 to 15 minutes left.
    Minutes(i64),
    FifteenToThirty,
    ThirtyToFortyFive,
    FortyFivePlus,
}

impl DeliveryEstimate {
    /// Bucket a whole number of remaining minutes.
    ///
    /// Each boundary belongs to the lower bucket: 15 is `Minutes(15)`, 30 is
    /// `FifteenToThirty`.
    #[must_use]
    pub const fn from_minutes(minutes: i64) -> Self {
        match minutes {
            i64::MIN..=0 => Self::ArrivingNow,
            1..=15 => Self::Minutes(minutes),
            16..=30 => Self::FifteenToThirty,
            31..=45 => Self::ThirtyToFortyFive,
            _ => Self::FortyFivePlus,
        }
    }

    /// Bucket the time between `now` and `eta`, rounding partial minutes up.
    #[must_use]
    pub fn between(now: DateTime<Utc>, eta: DateTime<Utc>) -> Self {
        let seconds = (eta - now).num_seconds();
        Self::from_minutes(seconds.saturating_add(59).div_euclid(60))
    }
}

impl fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrivingNow => f.write_str("Arriving now"),
            Self::Minutes(n) => write!(f, "{n} minutes"),
            Self::FifteenToThirty => f.write_str("15-30 minutes"),
            Self::ThirtyToFortyFive => f.write_str("30-45 minutes"),
            Self::FortyFivePlus => f.write_str("45+ minutes"),
        }
    }
}

/// Delivery time an order is expected at: the recorded estimate, or
/// placement plus the delivery window.
#[must_use]
pub fn expected_arrival(order: &Order) -> DateTime<Utc> {
    order
        .estimated_delivery
        .unwrap_or_else(|| order.created_at + TimeDelta::minutes(DELIVERY_WINDOW_MINUTES))
}

/// Remaining-time bucket for `order` as of `now`.
#[must_use]
pub fn estimate_remaining(order: &Order, now: DateTime<Utc>) -> DeliveryEstimate {
    DeliveryEstimate::between(now, expected_arrival(order))
}

/// Convert an externally stored order to the local display shape.
#[must_use]
pub fn order_from_stored(stored: StoredOrder, display_offset: &FixedOffset) -> Order {
    let timeline = derive_timeline_at(
        display_offset,
        stored.status,
        stored.created_at,
        stored.estimated_delivery,
    );
    Order {
        id: stored.id,
        order_number: stored.order_number,
        line_items: stored.line_items,
        subtotal: stored.subtotal,
        delivery_fee: stored.delivery_fee,
        total: stored.total,
        status: stored.status,
        created_at: stored.created_at,
        estimated_delivery_label: DeliveryEstimate::from_minutes(DELIVERY_WINDOW_MINUTES)
            .to_string(),
        estimated_delivery: stored.estimated_delivery,
        delivery_address: stored.delivery_address,
        timeline,
    }
}

/// Looks up orders by number, falling back to the external repository.
pub struct OrderTracker<R> {
    repository: Option<Arc<R>>,
    cache: Cache<String, Order>,
    display_offset: FixedOffset,
}

impl<R: OrderRepository> OrderTracker<R> {
    /// Create a tracker. Without a repository only local orders resolve.
    #[must_use]
    pub fn new(repository: Option<Arc<R>>, display_offset: FixedOffset) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            repository,
            cache,
            display_offset,
        }
    }

    /// Resolve an order number.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no store knows the number, or
    /// `AppError::ExternalService` if the external lookup fails.
    #[instrument(skip(self, orders))]
    pub async fn get_order(&self, orders: &OrderManager, order_number: &str) -> Result<Order> {
        let order_number = order_number.trim();

        if let Some(order) = orders.get(order_number) {
            debug!("Order found in local history");
            return Ok(order.clone());
        }

        if let Some(order) = self.cache.get(order_number).await {
            debug!("Cache hit for order");
            return Ok(order);
        }

        let Some(repository) = &self.repository else {
            return Err(AppError::NotFound(format!("Order {order_number}")));
        };

        let stored = repository
            .find_by_number(order_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_number}")))?;

        let order = order_from_stored(stored, &self.display_offset);
        self.cache
            .insert(order_number.to_owned(), order.clone())
            .await;

        Ok(order)
    }

    /// Drop a cached external order so the next lookup refetches it.
    pub async fn invalidate(&self, order_number: &str) {
        self.cache.invalidate(order_number).await;
    }
}
