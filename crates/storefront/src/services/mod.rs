//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Shopper cart with persisted line items
//! - `orders` - Order creation, numbering and status transitions
//! - `timeline` - Tracking timeline derivation
//! - `tracking` - Order lookup and delivery estimates
//! - `checkout` - Places orders with the external repository

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod timeline;
pub mod tracking;

pub use cart::CartStore;
pub use checkout::{CheckoutReceipt, CheckoutRequest, place_order};
pub use orders::{InitialStatusPolicy, OrderError, OrderManager, OrderSettings};
pub use timeline::{derive_timeline, derive_timeline_at};
pub use tracking::{DeliveryEstimate, OrderTracker, estimate_remaining};
