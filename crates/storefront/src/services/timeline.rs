//! Tracking timeline derivation.
//!
//! The timeline is never stored independently of its inputs: it is a pure
//! function of the order status, the creation time and the recorded delivery
//! estimate, and is regenerated whenever the status changes.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};

use clothing_drop_core::OrderStatus;

use crate::models::TimelineStep;

/// Minutes from order placement to nominal delivery.
pub const DELIVERY_WINDOW_MINUTES: i64 = 45;

/// Milestones after "Order Placed": status reached, label, minutes after placement.
const MILESTONES: [(OrderStatus, &str, i64); 4] = [
    (OrderStatus::Confirmed, "Order Confirmed", 2),
    (OrderStatus::Preparing, "Preparing Order", 5),
    (OrderStatus::InTransit, "Out for Delivery", 15),
    (OrderStatus::Delivered, "Delivered", DELIVERY_WINDOW_MINUTES),
];

/// Clock time as shown on the timeline, e.g. `02:05 PM`.
pub fn display_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%I:%M %p").to_string()
}

/// Derive the timeline for an order.
///
/// Emits "Order Placed", then one completed step per milestone the status has
/// reached. The "Out for Delivery" step is flagged current while the order is
/// in transit. Orders not yet delivered end with an open "Delivered" step
/// showing `Est.` and the recorded estimate, or placement plus the delivery
/// window when none is recorded.
pub fn derive_timeline<Tz: TimeZone>(
    status: OrderStatus,
    created_at: &DateTime<Tz>,
    estimated_delivery: Option<&DateTime<Tz>>,
) -> Vec<TimelineStep>
where
    Tz::Offset: fmt::Display,
{
    let mut steps = Vec::with_capacity(MILESTONES.len() + 1);
    steps.push(TimelineStep {
        label: "Order Placed".to_owned(),
        display_time: display_time(created_at),
        completed: true,
        current: None,
    });

    for (milestone, label, offset_minutes) in MILESTONES {
        if !status.has_reached(milestone) {
            continue;
        }
        let at = created_at.clone() + TimeDelta::minutes(offset_minutes);
        steps.push(TimelineStep {
            label: label.to_owned(),
            display_time: display_time(&at),
            completed: true,
            current: (milestone == OrderStatus::InTransit)
                .then_some(status == OrderStatus::InTransit),
        });
    }

    if !status.has_reached(OrderStatus::Delivered) {
        let eta = estimated_delivery.map_or_else(
            || created_at.clone() + TimeDelta::minutes(DELIVERY_WINDOW_MINUTES),
            Clone::clone,
        );
        steps.push(TimelineStep {
            label: "Delivered".to_owned(),
            display_time: format!("Est. {}", display_time(&eta)),
            completed: false,
            current: None,
        });
    }

    steps
}

/// Derive the timeline for stored UTC instants, shown in `offset` local time.
pub fn derive_timeline_at(
    offset: &FixedOffset,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    estimated_delivery: Option<DateTime<Utc>>,
) -> Vec<TimelineStep> {
    let estimate = estimated_delivery.map(|eta| eta.with_timezone(offset));
    derive_timeline(status, &created_at.with_timezone(offset), estimate.as_ref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn placed_at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-06-14T13:10:00+02:00").unwrap()
    }

    fn labels(steps: &[TimelineStep]) -> Vec<&str> {
        steps.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_pending_has_placed_and_estimate_only() {
        let steps = derive_timeline(OrderStatus::Pending, &placed_at(), None);
        assert_eq!(labels(&steps), ["Order Placed", "Delivered"]);
        assert_eq!(steps[0].display_time, "01:10 PM");
        assert!(steps[0].completed);
        assert_eq!(steps[1].display_time, "Est. 01:55 PM");
        assert!(!steps[1].completed);
    }

    #[test]
    fn test_preparing_steps_and_offsets() {
        let steps = derive_timeline(OrderStatus::Preparing, &placed_at(), None);
        assert_eq!(
            labels(&steps),
            ["Order Placed", "Order Confirmed", "Preparing Order", "Delivered"]
        );
        assert_eq!(steps[1].display_time, "01:12 PM");
        assert_eq!(steps[2].display_time, "01:15 PM");
        assert!(steps.iter().all(|s| s.current.is_none()));
    }

    #[test]
    fn test_in_transit_marks_current() {
        let steps = derive_timeline(OrderStatus::InTransit, &placed_at(), None);
        let out = &steps[3];
        assert_eq!(out.label, "Out for Delivery");
        assert_eq!(out.display_time, "01:25 PM");
        assert!(out.completed);
        assert_eq!(out.current, Some(true));
        assert_eq!(steps.len(), 5);
    }

    #[test]
    fn test_delivered_closes_timeline() {
        let steps = derive_timeline(OrderStatus::Delivered, &placed_at(), None);
        assert_eq!(
            labels(&steps),
            [
                "Order Placed",
                "Order Confirmed",
                "Preparing Order",
                "Out for Delivery",
                "Delivered"
            ]
        );
        assert_eq!(steps[3].current, Some(false));
        let last = steps.last().unwrap();
        assert!(last.completed);
        assert_eq!(last.display_time, "01:55 PM");
    }

    #[test]
    fn test_cancelled_reaches_no_milestone() {
        let steps = derive_timeline(OrderStatus::Cancelled, &placed_at(), None);
        assert_eq!(labels(&steps), ["Order Placed", "Delivered"]);
        assert!(!steps[1].completed);
    }

    #[test]
    fn test_recorded_estimate_wins() {
        let eta = placed_at() + TimeDelta::minutes(70);
        let steps = derive_timeline(OrderStatus::Confirmed, &placed_at(), Some(&eta));
        assert_eq!(steps.last().unwrap().display_time, "Est. 02:20 PM");
    }

    #[test]
    fn test_display_offset_applies() {
        let created = placed_at().with_timezone(&Utc);
        let sast = FixedOffset::east_opt(7200).unwrap();
        let steps = derive_timeline_at(&sast, OrderStatus::Confirmed, created, None);
        assert_eq!(steps[0].display_time, "01:10 PM");

        let utc = FixedOffset::east_opt(0).unwrap();
        let steps = derive_timeline_at(&utc, OrderStatus::Confirmed, created, None);
        assert_eq!(steps[0].display_time, "11:10 AM");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let created = Utc::now();
        for status in OrderStatus::ALL {
            assert_eq!(
                derive_timeline(status, &created, None),
                derive_timeline(status, &created, None)
            );
        }
    }
}
