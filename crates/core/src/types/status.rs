//! Order fulfillment status and its transition table.
//!
//! ```text
//! pending -> confirmed -> preparing -> in_transit -> delivered
//!    \___________\____________\____________\
//!                                           -> cancelled
//! ```
//!
//! Forward moves may skip stages (an external update can report `in_transit`
//! for an order last seen as `confirmed`). `delivered` and `cancelled` are
//! terminal.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    InTransit,
    Delivered,
    Cancelled,
}

/// Rejected status change.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Every status, in nominal order with `cancelled` last.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::InTransit,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses a freshly seeded demo order may start in.
    pub const IN_FLIGHT: [Self; 3] = [Self::Confirmed, Self::Preparing, Self::InTransit];

    /// Position along the nominal fulfillment path.
    ///
    /// `cancelled` sits off the path and has no stage.
    #[must_use]
    pub const fn stage(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Preparing => Some(2),
            Self::InTransit => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }

    /// True when this status is at or past `milestone` on the fulfillment path.
    #[must_use]
    pub fn has_reached(self, milestone: Self) -> bool {
        match (self.stage(), milestone.stage()) {
            (Some(current), Some(target)) => current >= target,
            _ => false,
        }
    }

    /// True for statuses no transition may leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the transition table allows moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.stage(), next.stage()) {
            (_, None) => true,
            (Some(current), Some(target)) => target > current,
            (None, Some(_)) => false,
        }
    }

    /// Validate a move against the transition table.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] if the move is not allowed.
    pub fn transition_to(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// Wire name (`in_transit`, `delivered`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Shopper-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}
