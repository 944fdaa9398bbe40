//! ClothingDrop storefront library.
//!
//! Cart, order lifecycle and order tracking for the ClothingDrop shop, with
//! durable local storage and a pluggable external order repository.
//!
//! # Modules
//!
//! - [`catalog`] - Product catalog and listing filters
//! - [`config`] - Environment configuration
//! - [`db`] - External order repository contract
//! - [`error`] - Unified error type
//! - [`models`] - Cart, order and product records
//! - [`services`] - Cart, orders, checkout and tracking
//! - [`state`] - Session state owning the stores
//! - [`storage`] - Key-value persistence backends

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{AppError, Result};
pub use state::Storefront;
