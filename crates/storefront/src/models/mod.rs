//! Domain models for the storefront.
//!
//! These types are the persisted JSON shapes of the cart and order history
//! as well as the catalog's product records.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::CartLineItem;
pub use order::{Order, OrderLineItem, TimelineStep};
pub use product::Product;
