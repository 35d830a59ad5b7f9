//! Capacity ledger rules
//!
//! The ledger invariant for every event is:
//! `tickets_sold + available_tickets == total_capacity`, with
//! `available_tickets >= 0`. The reservation itself is performed by the
//! storage backend as one atomic conditional update
//! ([`crate::store::EventStore::register_participant`]); this module holds
//! the pure rules around it.

use crate::error::{TicketingError, TicketingResult};
use crate::models::{Event, EventChanges};

/// Validate the capacity an event is created with
///
/// # Errors
///
/// Returns `TicketingError::Validation` unless `total_capacity >= 1`.
pub fn validate_initial_capacity(total_capacity: i32) -> TicketingResult<()> {
    if total_capacity < 1 {
        return Err(TicketingError::validation(
            "Total capacity must be a positive integer",
        ));
    }
    Ok(())
}

/// True once the event has sold at least one ticket
///
/// From that point on, `total_capacity`, `ticket_price`, and `event_date`
/// may no longer change.
pub fn fields_locked(event: &Event) -> bool {
    event.tickets_sold > 0
}

/// The first locked field a change set would actually alter, if any
///
/// Writing the same value back is not a change; only a differing value
/// trips the lock.
pub fn locked_field_change(event: &Event, changes: &EventChanges) -> Option<&'static str> {
    if changes
        .total_capacity
        .is_some_and(|c| c != event.total_capacity)
    {
        return Some("total_capacity");
    }
    if changes
        .ticket_price
        .is_some_and(|p| (p - event.ticket_price).abs() > f64::EPSILON)
    {
        return Some("ticket_price");
    }
    if changes.event_date.is_some_and(|d| d != event.event_date) {
        return Some("event_date");
    }
    None
}

/// Check the three-way ledger invariant for an event
pub fn invariant_holds(event: &Event) -> bool {
    event.available_tickets >= 0
        && event.tickets_sold >= 0
        && event.tickets_sold + event.available_tickets == event.total_capacity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEvent;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn event_with_sales(sold: i32) -> Event {
        let mut event = Event::new(
            Uuid::new_v4(),
            NewEvent {
                title: "Concert".to_string(),
                description: "Live show".to_string(),
                event_date: Utc::now(),
                event_time: "20:00".to_string(),
                location: "Arena".to_string(),
                ticket_price: 50.0,
                total_capacity: 10,
                image_url: None,
                image_ref: None,
            },
        )
        .unwrap();
        event.tickets_sold = sold;
        event.available_tickets = 10 - sold;
        event
    }

    #[test]
    fn lock_engages_after_first_sale() {
        assert!(!fields_locked(&event_with_sales(0)));
        assert!(fields_locked(&event_with_sales(1)));
    }

    #[test]
    fn same_value_write_is_not_a_change() {
        let event = event_with_sales(3);
        let changes = EventChanges {
            total_capacity: Some(event.total_capacity),
            ticket_price: Some(event.ticket_price),
            event_date: Some(event.event_date),
            ..Default::default()
        };
        assert_eq!(locked_field_change(&event, &changes), None);
    }

    #[test]
    fn differing_locked_values_are_detected() {
        let event = event_with_sales(3);

        let capacity_change = EventChanges {
            total_capacity: Some(event.total_capacity + 5),
            ..Default::default()
        };
        assert_eq!(
            locked_field_change(&event, &capacity_change),
            Some("total_capacity")
        );

        let price_change = EventChanges {
            ticket_price: Some(event.ticket_price + 10.0),
            ..Default::default()
        };
        assert_eq!(
            locked_field_change(&event, &price_change),
            Some("ticket_price")
        );

        let date_change = EventChanges {
            event_date: Some(event.event_date + Duration::days(1)),
            ..Default::default()
        };
        assert_eq!(locked_field_change(&event, &date_change), Some("event_date"));
    }

    #[test]
    fn invariant_detects_drift() {
        let mut event = event_with_sales(4);
        assert!(invariant_holds(&event));

        event.available_tickets -= 1;
        assert!(!invariant_holds(&event));

        event.available_tickets = -1;
        assert!(!invariant_holds(&event));
    }

    #[test]
    fn initial_capacity_must_be_positive() {
        assert!(validate_initial_capacity(1).is_ok());
        assert!(validate_initial_capacity(0).is_err());
        assert!(validate_initial_capacity(-5).is_err());
    }
}
