//! Unified error handling.
//!
//! Provides a unified `AppError` type returned by every storefront operation
//! that can fail. Layer-specific errors (`StorageError`, `RepositoryError`,
//! `ConfigError`, `StatusTransitionError`) convert into it with `?`.

use thiserror::Error;

use clothing_drop_core::StatusTransitionError;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::orders::OrderError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order, product, or line not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied incomplete or inconsistent input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Durable local storage failed.
    #[error("Storage error: {0}")]
    Persistence(#[from] StorageError),

    /// The external order service failed.
    #[error("Order service error: {0}")]
    ExternalService(#[from] RepositoryError),

    /// Requested status change is not allowed.
    #[error("Illegal transition: {0}")]
    IllegalTransition(#[from] StatusTransitionError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// HTTP-style status code a presentation layer would report.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::IllegalTransition(_) => 409,
            Self::ExternalService(_) => 502,
            Self::Persistence(_) | Self::Config(_) => 500,
        }
    }

    /// Message safe to show a shopper.
    ///
    /// Internal details of storage and upstream failures are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Config(_) => "Internal error".to_owned(),
            Self::ExternalService(_) => "Order service unavailable, please try again".to_owned(),
            Self::NotFound(_) | Self::Validation(_) | Self::IllegalTransition(_) => {
                self.to_string()
            }
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(number) => Self::NotFound(format!("Order {number}")),
            OrderError::IllegalTransition(transition) => Self::IllegalTransition(transition),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
