//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CLOTHINGDROP_DATA_DIR` - Directory for persisted cart and orders (default: .clothingdrop)
//! - `CLOTHINGDROP_DEMO_MODE` - Seed new orders with a random in-flight status (default: true)
//! - `CLOTHINGDROP_DELIVERY_FEE` - Flat delivery fee per order (default: 99.99)
//! - `CLOTHINGDROP_CURRENCY` - Display currency code (default: ZAR)
//! - `CLOTHINGDROP_UTC_OFFSET_MINUTES` - Offset for displayed clock times (default: 120, SAST)

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use clothing_drop_core::{CurrencyCode, OrderStatus};

use crate::services::orders::{InitialStatusPolicy, OrderSettings};

const DEFAULT_DATA_DIR: &str = ".clothingdrop";
const DEFAULT_DELIVERY_FEE: &str = "99.99";
const DEFAULT_UTC_OFFSET_MINUTES: &str = "120";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding `clothingdrop-cart.json` and `clothingdrop-orders.json`
    pub data_dir: PathBuf,
    /// New orders start in a random in-flight status when set
    pub demo_mode: bool,
    /// Flat delivery fee added to every order
    pub delivery_fee: Decimal,
    /// Currency used for price display
    pub currency: CurrencyCode,
    /// Offset used for timeline clock times
    pub display_offset: FixedOffset,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            demo_mode: true,
            delivery_fee: Decimal::new(9999, 2),
            currency: CurrencyCode::default(),
            display_offset: FixedOffset::east_opt(120 * 60).unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(env("CLOTHINGDROP_DATA_DIR", DEFAULT_DATA_DIR));
        let demo_mode = parse_bool(
            "CLOTHINGDROP_DEMO_MODE",
            &env("CLOTHINGDROP_DEMO_MODE", "true"),
        )?;
        let delivery_fee = parse_var::<Decimal>(
            "CLOTHINGDROP_DELIVERY_FEE",
            &env("CLOTHINGDROP_DELIVERY_FEE", DEFAULT_DELIVERY_FEE),
        )?;
        if delivery_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "CLOTHINGDROP_DELIVERY_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let currency = parse_var::<CurrencyCode>(
            "CLOTHINGDROP_CURRENCY",
            &env("CLOTHINGDROP_CURRENCY", "ZAR"),
        )?;
        let offset_minutes = parse_var::<i32>(
            "CLOTHINGDROP_UTC_OFFSET_MINUTES",
            &env("CLOTHINGDROP_UTC_OFFSET_MINUTES", DEFAULT_UTC_OFFSET_MINUTES),
        )?;
        let display_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CLOTHINGDROP_UTC_OFFSET_MINUTES".to_string(),
                    format!("offset out of range: {offset_minutes}"),
                )
            })?;

        Ok(Self {
            data_dir,
            demo_mode,
            delivery_fee,
            currency,
            display_offset,
        })
    }

    /// Order manager settings derived from this configuration.
    #[must_use]
    pub const fn order_settings(&self) -> OrderSettings {
        OrderSettings {
            delivery_fee: self.delivery_fee,
            display_offset: self.display_offset,
            initial_status: if self.demo_mode {
                InitialStatusPolicy::DemoRandom
            } else {
                InitialStatusPolicy::Fixed(OrderStatus::Confirmed)
            },
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable with `FromStr`, naming the variable on failure.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
