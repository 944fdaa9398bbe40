//! Order record and its derived tracking timeline.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clothing_drop_core::{Address, OrderId, OrderNumber, OrderStatus, ProductId};

use super::CartLineItem;

/// Snapshot of a cart line taken at checkout.
///
/// Never mutated after the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_ref: String,
    pub size: String,
    pub quantity: u32,
    pub category: String,
}

impl OrderLineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<&CartLineItem> for OrderLineItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price: line.unit_price,
            image_ref: line.image_ref.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            category: line.category.clone(),
        }
    }
}

/// One fulfillment milestone as shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub label: String,
    pub display_time: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub line_items: Vec<OrderLineItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivery_address: Address,
    pub timeline: Vec<TimelineStep>,
}

impl Order {
    /// Sum of line totals.
    #[must_use]
    pub fn items_subtotal(items: &[OrderLineItem]) -> Decimal {
        items.iter().map(OrderLineItem::line_total).sum()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }
}
