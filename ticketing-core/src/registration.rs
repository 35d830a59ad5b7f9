//! Registration guard
//!
//! Decides admission for a registration attempt and keeps the participant
//! set consistent. Checks run in a fixed order: event existence, duplicate
//! registration, contact validation, then the atomic reserve-and-append at
//! the storage boundary. The duplicate pre-check is a fast path only; the
//! authoritative duplicate and capacity decisions happen inside
//! [`EventStore::register_participant`], so concurrent attempts serialize
//! per event.

use tracing::info;
use uuid::Uuid;

use crate::error::{TicketingError, TicketingResult};
use crate::models::{ContactInfo, Participant, Principal};
use crate::store::EventStore;

pub struct RegistrationGuard<'a> {
    store: &'a dyn EventStore,
}

impl<'a> RegistrationGuard<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self { store }
    }

    /// Register `principal` for the event, reserving exactly one ticket
    ///
    /// # Errors
    ///
    /// - `NotFound` when the event does not exist
    /// - `AlreadyRegistered` when the user already holds a registration
    /// - `Validation` when a contact field is missing
    /// - `SoldOut` when no ticket remained at reservation time; no
    ///   participant is appended in that case
    pub async fn register(
        &self,
        event_id: Uuid,
        principal: &Principal,
        contact: ContactInfo,
        payment_id: Option<String>,
    ) -> TicketingResult<Participant> {
        self.store
            .fetch_event(event_id)
            .await?
            .ok_or(TicketingError::NotFound)?;

        let existing = self.store.list_participants(event_id).await?;
        if existing.iter().any(|p| p.user_id == principal.id) {
            return Err(TicketingError::AlreadyRegistered);
        }

        contact.validate()?;

        let participant = Participant::new(event_id, principal.id, contact, payment_id);
        self.store.register_participant(&participant).await?;

        info!(
            event_id = %event_id,
            user_id = %principal.id,
            participant_id = %participant.id,
            "Registration completed"
        );
        Ok(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity;
    use crate::memory::InMemoryEventStore;
    use crate::models::{Event, NewEvent, Role};
    use chrono::Utc;
    use std::sync::Arc;

    fn contact(name: &str) -> ContactInfo {
        ContactInfo {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: "555-0100".to_string(),
        }
    }

    async fn seeded_store(capacity: i32) -> (Arc<InMemoryEventStore>, Uuid) {
        let store = Arc::new(InMemoryEventStore::new());
        let event = Event::new(
            Uuid::new_v4(),
            NewEvent {
                title: "Launch Party".to_string(),
                description: "Open bar".to_string(),
                event_date: Utc::now(),
                event_time: "19:00".to_string(),
                location: "Rooftop".to_string(),
                ticket_price: 10.0,
                total_capacity: capacity,
                image_url: None,
                image_ref: None,
            },
        )
        .unwrap();
        let id = event.id;
        store.insert_event(&event).await.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn register_reserves_exactly_one_ticket() {
        let (store, event_id) = seeded_store(3).await;
        let guard = RegistrationGuard::new(store.as_ref());
        let user = Principal::new(Uuid::new_v4(), Role::Customer);

        let participant = guard
            .register(event_id, &user, contact("Ada"), Some("pay-123".to_string()))
            .await
            .unwrap();
        assert_eq!(participant.payment_id, "pay-123");

        let event = store.fetch_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 2);
        assert_eq!(event.tickets_sold, 1);
        assert!(capacity::invariant_holds(&event));
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let (store, _) = seeded_store(3).await;
        let guard = RegistrationGuard::new(store.as_ref());
        let user = Principal::new(Uuid::new_v4(), Role::Customer);

        let err = guard
            .register(Uuid::new_v4(), &user, contact("Ada"), None)
            .await
            .unwrap_err();
        assert_eq!(err, TicketingError::NotFound);
    }

    #[tokio::test]
    async fn missing_contact_field_is_rejected_before_reservation() {
        let (store, event_id) = seeded_store(3).await;
        let guard = RegistrationGuard::new(store.as_ref());
        let user = Principal::new(Uuid::new_v4(), Role::Customer);

        let mut bad = contact("Ada");
        bad.phone_number = "  ".to_string();
        let err = guard.register(event_id, &user, bad, None).await.unwrap_err();
        assert!(matches!(err, TicketingError::Validation(_)));

        // Nothing was reserved and nobody was appended.
        let event = store.fetch_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 3);
        assert!(store.list_participants(event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let (store, event_id) = seeded_store(3).await;
        let guard = RegistrationGuard::new(store.as_ref());
        let user = Principal::new(Uuid::new_v4(), Role::Customer);

        guard
            .register(event_id, &user, contact("Ada"), None)
            .await
            .unwrap();
        let err = guard
            .register(event_id, &user, contact("Ada"), None)
            .await
            .unwrap_err();
        assert_eq!(err, TicketingError::AlreadyRegistered);

        let event = store.fetch_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.tickets_sold, 1);
    }

    #[tokio::test]
    async fn last_ticket_race_admits_exactly_one() {
        let (store, event_id) = seeded_store(1).await;
        let alice = Principal::new(Uuid::new_v4(), Role::Customer);
        let bob = Principal::new(Uuid::new_v4(), Role::Customer);

        let store_a = Arc::clone(&store);
        let store_b = Arc::clone(&store);
        let task_a = tokio::spawn(async move {
            RegistrationGuard::new(store_a.as_ref())
                .register(event_id, &alice, contact("Alice"), None)
                .await
        });
        let task_b = tokio::spawn(async move {
            RegistrationGuard::new(store_b.as_ref())
                .register(event_id, &bob, contact("Bob"), None)
                .await
        });

        let (res_a, res_b) = (task_a.await.unwrap(), task_b.await.unwrap());
        let successes = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
        let sold_out = [&res_a, &res_b]
            .iter()
            .filter(|r| matches!(r, Err(TicketingError::SoldOut)))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(sold_out, 1);

        let event = store.fetch_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 0);
        assert_eq!(event.tickets_sold, 1);
        assert!(capacity::invariant_holds(&event));
    }

    #[tokio::test]
    async fn same_user_race_admits_exactly_one() {
        let (store, event_id) = seeded_store(5).await;
        let user = Principal::new(Uuid::new_v4(), Role::Customer);

        let (u1, u2) = (user.clone(), user);
        let store_a = Arc::clone(&store);
        let store_b = Arc::clone(&store);
        let task_a = tokio::spawn(async move {
            RegistrationGuard::new(store_a.as_ref())
                .register(event_id, &u1, contact("Ada"), None)
                .await
        });
        let task_b = tokio::spawn(async move {
            RegistrationGuard::new(store_b.as_ref())
                .register(event_id, &u2, contact("Ada"), None)
                .await
        });

        let (res_a, res_b) = (task_a.await.unwrap(), task_b.await.unwrap());
        let successes = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
        let duplicates = [&res_a, &res_b]
            .iter()
            .filter(|r| matches!(r, Err(TicketingError::AlreadyRegistered)))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);

        let event = store.fetch_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 4);
        let participants = store.list_participants(event_id).await.unwrap();
        assert_eq!(participants.len(), 1);
    }

    #[tokio::test]
    async fn fill_to_capacity_then_sold_out() {
        let (store, event_id) = seeded_store(2).await;
        let guard = RegistrationGuard::new(store.as_ref());

        for name in ["Alice", "Bob"] {
            let user = Principal::new(Uuid::new_v4(), Role::Customer);
            guard
                .register(event_id, &user, contact(name), None)
                .await
                .unwrap();
        }

        let event = store.fetch_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 0);
        assert_eq!(event.tickets_sold, 2);

        let carol = Principal::new(Uuid::new_v4(), Role::Customer);
        let err = guard
            .register(event_id, &carol, contact("Carol"), None)
            .await
            .unwrap_err();
        assert_eq!(err, TicketingError::SoldOut);

        // The failed attempt appended nothing.
        assert_eq!(store.list_participants(event_id).await.unwrap().len(), 2);
    }
}
