//! External order repository contract.
//!
//! The managed order database is an external collaborator. This module defines
//! the contract the storefront relies on and an in-memory implementation used
//! in demo mode and tests.
//!
//! # Contract
//!
//! - `create_order` inserts the order row and echoes it back with the
//!   repository-assigned [`OrderId`]
//! - `insert_line_items` attaches the line-item snapshot to an existing row
//! - `delete_order` removes a row together with its line items (used as the
//!   compensating action when line-item insertion fails)
//! - lookups return `Ok(None)` for unknown orders; only transport or data
//!   failures are errors

mod memory;

pub use memory::InMemoryOrderRepository;

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clothing_drop_core::{Address, OrderId, OrderNumber, OrderStatus};

use crate::models::OrderLineItem;

/// Errors raised by an order repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing service rejected or failed the operation.
    #[error("database error: {0}")]
    Database(String),

    /// Data in the repository is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate order number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Order row to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: String,
    pub order_number: OrderNumber,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub delivery_address: Address,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Order row as stored by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrder {
    pub id: OrderId,
    pub customer_id: String,
    pub order_number: OrderNumber,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub delivery_address: Address,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
}

/// Durable order storage owned by an external service.
pub trait OrderRepository: Send + Sync {
    /// Insert an order row and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number is taken.
    fn create_order(
        &self,
        order: NewOrder,
    ) -> impl Future<Output = Result<StoredOrder, RepositoryError>> + Send;

    /// Attach line items to an existing order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    fn insert_line_items(
        &self,
        order_id: OrderId,
        items: &[OrderLineItem],
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch an order with its line items by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup itself fails.
    fn get_order(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<Option<StoredOrder>, RepositoryError>> + Send;

    /// Fetch an order with its line items by display order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup itself fails.
    fn find_by_number(
        &self,
        order_number: &str,
    ) -> impl Future<Output = Result<Option<StoredOrder>, RepositoryError>> + Send;

    /// Overwrite an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<StoredOrder, RepositoryError>> + Send;

    /// Delete an order and its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails. Deleting a missing order is not an error.
    fn delete_order(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
