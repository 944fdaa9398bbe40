//! ClothingDrop Core - Shared types library.
//!
//! This crate provides common types used across all ClothingDrop components:
//! - `storefront` - Cart, order lifecycle and tracking services
//! - `cli` - Command-line driver for the storefront services
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, addresses, order numbers and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
