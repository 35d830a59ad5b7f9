//! In-memory event store
//!
//! Backs unit and HTTP-level tests without a database. A single mutex
//! serializes every operation, which trivially satisfies the atomicity
//! contract of [`EventStore::register_participant`].

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{TicketingError, TicketingResult};
use crate::models::{Event, Participant};
use crate::store::EventStore;

#[derive(Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    participants: HashMap<Uuid, Vec<Participant>>,
}

/// Mutex-guarded map-backed store with the same observable semantics as the
/// PostgreSQL repository
#[derive(Default)]
pub struct InMemoryEventStore {
    inner: Mutex<Inner>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert_event(&self, event: &Event) -> TicketingResult<()> {
        let mut inner = self.inner.lock();
        inner.events.insert(event.id, event.clone());
        inner.participants.entry(event.id).or_default();
        Ok(())
    }

    async fn fetch_event(&self, id: Uuid) -> TicketingResult<Option<Event>> {
        Ok(self.inner.lock().events.get(&id).cloned())
    }

    async fn list_active_events(
        &self,
        limit: i64,
        offset: i64,
    ) -> TicketingResult<(Vec<Event>, i64)> {
        let inner = self.inner.lock();
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.is_active)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = events.len() as i64;
        let page = events
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_events_by_owner(&self, owner: Uuid) -> TicketingResult<Vec<Event>> {
        let inner = self.inner.lock();
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn update_event(&self, event: &Event) -> TicketingResult<()> {
        let mut inner = self.inner.lock();
        let stored = inner
            .events
            .get_mut(&event.id)
            .ok_or(TicketingError::NotFound)?;

        // The caller's snapshot may predate a concurrent reservation, so
        // the ledger columns keep their stored values.
        let mut updated = event.clone();
        updated.total_capacity = stored.total_capacity;
        updated.available_tickets = stored.available_tickets;
        updated.tickets_sold = stored.tickets_sold;
        *stored = updated;
        Ok(())
    }

    async fn resize_capacity(&self, id: Uuid, total_capacity: i32) -> TicketingResult<()> {
        let mut inner = self.inner.lock();
        let event = inner.events.get_mut(&id).ok_or(TicketingError::NotFound)?;
        if event.tickets_sold != 0 {
            return Err(TicketingError::LockedField {
                field: "total_capacity".to_string(),
            });
        }
        event.total_capacity = total_capacity;
        event.available_tickets = total_capacity;
        event.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> TicketingResult<bool> {
        let mut inner = self.inner.lock();
        inner.participants.remove(&id);
        Ok(inner.events.remove(&id).is_some())
    }

    async fn list_participants(&self, event_id: Uuid) -> TicketingResult<Vec<Participant>> {
        Ok(self
            .inner
            .lock()
            .participants
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn register_participant(&self, participant: &Participant) -> TicketingResult<()> {
        let mut inner = self.inner.lock();
        let Inner {
            events,
            participants,
        } = &mut *inner;

        let event = events
            .get_mut(&participant.event_id)
            .ok_or(TicketingError::NotFound)?;
        let list = participants.entry(participant.event_id).or_default();

        if list.iter().any(|p| p.user_id == participant.user_id) {
            return Err(TicketingError::AlreadyRegistered);
        }
        if event.available_tickets <= 0 {
            return Err(TicketingError::SoldOut);
        }

        event.available_tickets -= 1;
        event.tickets_sold += 1;
        event.updated_at = chrono::Utc::now();
        list.push(participant.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactInfo, NewEvent};
    use chrono::Utc;

    async fn seeded_event(store: &InMemoryEventStore, capacity: i32) -> Event {
        let event = Event::new(
            Uuid::new_v4(),
            NewEvent {
                title: "Meetup".to_string(),
                description: "Monthly".to_string(),
                event_date: Utc::now(),
                event_time: "18:00".to_string(),
                location: "Hall B".to_string(),
                ticket_price: 10.0,
                total_capacity: capacity,
                image_url: None,
                image_ref: None,
            },
        )
        .unwrap();
        store.insert_event(&event).await.unwrap();
        event
    }

    fn participant_for(event_id: Uuid) -> Participant {
        Participant::new(
            event_id,
            Uuid::new_v4(),
            ContactInfo {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone_number: "555-0100".to_string(),
            },
            None,
        )
    }

    #[tokio::test]
    async fn stale_snapshot_update_preserves_reservation() {
        let store = InMemoryEventStore::new();
        let event = seeded_event(&store, 5).await;

        // Owner reads the event, then a registration commits before the
        // owner's write lands.
        let mut snapshot = store.fetch_event(event.id).await.unwrap().unwrap();
        store
            .register_participant(&participant_for(event.id))
            .await
            .unwrap();

        snapshot.description = "Doors open at 17:30".to_string();
        store.update_event(&snapshot).await.unwrap();

        let after = store.fetch_event(event.id).await.unwrap().unwrap();
        assert_eq!(after.description, "Doors open at 17:30");
        assert_eq!(after.tickets_sold, 1);
        assert_eq!(after.available_tickets, 4);
        assert_eq!(store.list_participants(event.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resize_capacity_only_before_first_sale() {
        let store = InMemoryEventStore::new();
        let event = seeded_event(&store, 5).await;

        store.resize_capacity(event.id, 9).await.unwrap();
        let resized = store.fetch_event(event.id).await.unwrap().unwrap();
        assert_eq!(resized.total_capacity, 9);
        assert_eq!(resized.available_tickets, 9);

        store
            .register_participant(&participant_for(event.id))
            .await
            .unwrap();
        assert_eq!(
            store.resize_capacity(event.id, 20).await.unwrap_err(),
            TicketingError::LockedField {
                field: "total_capacity".to_string()
            }
        );
        assert_eq!(
            store.resize_capacity(Uuid::new_v4(), 3).await.unwrap_err(),
            TicketingError::NotFound
        );
    }
}
