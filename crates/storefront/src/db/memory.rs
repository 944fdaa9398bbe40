//! In-memory order repository for demo mode.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use clothing_drop_core::{OrderId, OrderStatus};

use super::{NewOrder, OrderRepository, RepositoryError, StoredOrder};
use crate::models::OrderLineItem;

/// Repository backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<OrderId, StoredOrder>>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }

    /// True when no orders are stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<OrderId, StoredOrder>>, RepositoryError> {
        self.orders
            .lock()
            .map_err(|_| RepositoryError::Database("order map lock poisoned".to_owned()))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, order: NewOrder) -> Result<StoredOrder, RepositoryError> {
        let mut orders = self.lock()?;
        if orders
            .values()
            .any(|existing| existing.order_number == order.order_number)
        {
            return Err(RepositoryError::Conflict(format!(
                "order number {} already exists",
                order.order_number
            )));
        }

        let stored = StoredOrder {
            id: OrderId::generate(),
            customer_id: order.customer_id,
            order_number: order.order_number,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            total: order.total,
            status: order.status,
            delivery_address: order.delivery_address,
            estimated_delivery: order.estimated_delivery,
            created_at: order.created_at,
            updated_at: order.created_at,
            line_items: Vec::new(),
        };
        orders.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_line_items(
        &self,
        order_id: OrderId,
        items: &[OrderLineItem],
    ) -> Result<(), RepositoryError> {
        let mut orders = self.lock()?;
        let order = orders.get_mut(&order_id).ok_or(RepositoryError::NotFound)?;
        order.line_items.extend_from_slice(items);
        Ok(())
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<StoredOrder>, RepositoryError> {
        Ok(self.lock()?.get(&order_id).cloned())
    }

    async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<StoredOrder>, RepositoryError> {
        Ok(self
            .lock()?
            .values()
            .find(|order| order.order_number == *order_number)
            .cloned())
    }

    async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<StoredOrder, RepositoryError> {
        let mut orders = self.lock()?;
        let order = orders.get_mut(&order_id).ok_or(RepositoryError::NotFound)?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_order(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        self.lock()?.remove(&order_id);
        Ok(())
    }
}
