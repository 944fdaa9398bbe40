//! Order lifecycle manager.
//!
//! Converts cart snapshots into orders, assigns display order numbers, and
//! applies validated status transitions. The local history is persisted
//! newest-first under [`ORDERS_KEY`].

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeDelta, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use clothing_drop_core::{Address, OrderId, OrderNumber, OrderStatus, StatusTransitionError};

use crate::models::{Order, OrderLineItem};
use crate::storage::{KeyValueStore, ORDERS_KEY, StorageError, read_json, write_json};

use super::timeline::{DELIVERY_WINDOW_MINUTES, derive_timeline_at};
use super::tracking::DeliveryEstimate;

/// How a new order's first status is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialStatusPolicy {
    /// Every order starts in this status.
    Fixed(OrderStatus),
    /// Demo seeding: pick uniformly from the in-flight statuses so the
    /// tracking page has something to show.
    DemoRandom,
}

/// Settings for [`OrderManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSettings {
    pub delivery_fee: Decimal,
    /// Offset for timeline clock times and order-number dates.
    pub display_offset: FixedOffset,
    pub initial_status: InitialStatusPolicy,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(9999, 2),
            display_offset: FixedOffset::east_opt(120 * 60).unwrap_or_else(|| Utc.fix()),
            initial_status: InitialStatusPolicy::DemoRandom,
        }
    }
}

/// Errors from order status updates.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    IllegalTransition(#[from] StatusTransitionError),
}

/// Owns the local order history.
pub struct OrderManager {
    storage: Arc<dyn KeyValueStore>,
    orders: Vec<Order>,
    settings: OrderSettings,
    rng: StdRng,
}

impl std::fmt::Debug for OrderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManager")
            .field("orders", &self.orders.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl OrderManager {
    /// Load the persisted history.
    ///
    /// Missing or malformed data yields an empty history.
    pub fn init(storage: Arc<dyn KeyValueStore>, settings: OrderSettings) -> Self {
        let orders = match read_json::<Vec<Order>>(storage.as_ref(), ORDERS_KEY) {
            Ok(orders) => orders.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable order history");
                Vec::new()
            }
        };

        Self {
            storage,
            orders,
            settings,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replace the random source used for demo seeding.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// All orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    /// Create and record an order from a line-item snapshot.
    pub fn create_order(
        &mut self,
        items: &[OrderLineItem],
        delivery_address: Option<Address>,
    ) -> OrderNumber {
        self.create_order_at(items, delivery_address, Utc::now())
    }

    /// [`create_order`](Self::create_order) with an explicit clock.
    #[instrument(skip(self, items, delivery_address), fields(lines = items.len()))]
    pub fn create_order_at(
        &mut self,
        items: &[OrderLineItem],
        delivery_address: Option<Address>,
        now: DateTime<Utc>,
    ) -> OrderNumber {
        let order = self.prepare_order(items, delivery_address, now);
        let order_number = order.order_number.clone();
        self.commit(order);
        order_number
    }

    /// Build an order without recording it.
    ///
    /// Used by checkout, which records the order only once the external
    /// repository has accepted it.
    pub fn prepare_order(
        &mut self,
        items: &[OrderLineItem],
        delivery_address: Option<Address>,
        now: DateTime<Utc>,
    ) -> Order {
        let subtotal = Order::items_subtotal(items);
        let delivery_fee = self.settings.delivery_fee;
        let status = self.initial_status();
        let estimated_delivery = now + TimeDelta::minutes(DELIVERY_WINDOW_MINUTES);
        let local_date = now.with_timezone(&self.settings.display_offset).date_naive();

        Order {
            id: OrderId::generate(),
            order_number: self.next_order_number(local_date),
            line_items: items.to_vec(),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            status,
            created_at: now,
            estimated_delivery_label: DeliveryEstimate::from_minutes(DELIVERY_WINDOW_MINUTES)
                .to_string(),
            estimated_delivery: Some(estimated_delivery),
            delivery_address: delivery_address.unwrap_or_else(Address::demo),
            timeline: derive_timeline_at(
                &self.settings.display_offset,
                status,
                now,
                Some(estimated_delivery),
            ),
        }
    }

    /// Record an order at the head of the history and persist.
    pub fn commit(&mut self, order: Order) {
        info!(
            order_number = %order.order_number,
            status = %order.status,
            total = %order.total,
            "Order created"
        );
        self.orders.insert(0, order);
        self.persist();
    }

    /// Exact-match lookup by order number.
    #[must_use]
    pub fn get(&self, order_number: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.order_number == *order_number)
    }

    /// Most recently created order.
    #[must_use]
    pub fn latest(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Move an order to `status` and regenerate its timeline.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown number and
    /// `OrderError::IllegalTransition` if the transition table forbids the move.
    #[instrument(skip(self))]
    pub fn update_status(
        &mut self,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<&Order, OrderError> {
        let offset = self.settings.display_offset;
        let index = self
            .orders
            .iter()
            .position(|order| order.order_number == *order_number)
            .ok_or_else(|| OrderError::NotFound(order_number.to_owned()))?;

        let Some(order) = self.orders.get_mut(index) else {
            return Err(OrderError::NotFound(order_number.to_owned()));
        };
        let previous = order.status;
        order.status = previous.transition_to(status)?;
        order.timeline =
            derive_timeline_at(&offset, order.status, order.created_at, order.estimated_delivery);
        info!(from = %previous, to = %status, "Order status updated");

        self.persist();
        self.orders
            .get(index)
            .ok_or_else(|| OrderError::NotFound(order_number.to_owned()))
    }

    /// Write the history to storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn flush(&self) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), ORDERS_KEY, &self.orders)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist order history");
        }
    }

    fn initial_status(&mut self) -> OrderStatus {
        match self.settings.initial_status {
            InitialStatusPolicy::Fixed(status) => status,
            InitialStatusPolicy::DemoRandom => OrderStatus::IN_FLIGHT
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(OrderStatus::Confirmed),
        }
    }

    /// Give `order` the next free number after its current one.
    ///
    /// Used when the order service reports the number as taken by another
    /// session.
    pub fn renumber(&self, order: &mut Order) {
        let date = order
            .created_at
            .with_timezone(&self.settings.display_offset)
            .date_naive();
        let after = order.order_number.sequence().unwrap_or(0).saturating_add(1);
        order.order_number = self.free_order_number(date, after);
    }

    /// Sequence is the order count plus one, bumped past any number already taken.
    fn next_order_number(&self, date: NaiveDate) -> OrderNumber {
        let sequence = u32::try_from(self.orders.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        self.free_order_number(date, sequence)
    }

    fn free_order_number(&self, date: NaiveDate, mut sequence: u32) -> OrderNumber {
        loop {
            let candidate = OrderNumber::compose(date, sequence);
            if self.get(candidate.as_str()).is_none() || sequence == u32::MAX {
                return candidate;
            }
            sequence = sequence.saturating_add(1);
        }
    }
}
