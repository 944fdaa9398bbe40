//! Core types for ClothingDrop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod order_number;
pub mod price;
pub mod status;

pub use address::Address;
pub use id::*;
pub use order_number::{OrderNumber, OrderNumberError};
pub use price::{
    CartTotals, CurrencyCode, Price, PriceBand, PriceDisplay, PricedItem, ZAR_PRICE_BANDS,
    calculate_discount, calculate_savings, format_price, price_range,
};
pub use status::*;
