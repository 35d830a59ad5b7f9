//! Event mutation coordinator
//!
//! Orchestrates authorization, the capacity ledger's locked-field rule, and
//! media cleanup for event create/update/delete. Media release failures are
//! logged and never abort the owning mutation; the event change wins over
//! orphaned media cleanup.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use media_store::MediaStore;

use crate::authorize;
use crate::capacity;
use crate::error::{TicketingError, TicketingResult};
use crate::models::{Event, EventChanges, NewEvent, Principal};
use crate::store::EventStore;

pub struct EventMutationCoordinator<'a> {
    store: &'a dyn EventStore,
    media: &'a dyn MediaStore,
}

impl<'a> EventMutationCoordinator<'a> {
    pub fn new(store: &'a dyn EventStore, media: &'a dyn MediaStore) -> Self {
        Self { store, media }
    }

    /// Create an event owned by the principal
    ///
    /// # Errors
    ///
    /// `Forbidden` unless the principal is an organizer or admin;
    /// `Validation` when capacity or required fields are invalid.
    pub async fn create(
        &self,
        principal: &Principal,
        spec: NewEvent,
    ) -> TicketingResult<Event> {
        authorize::require_create_role(principal.role)?;

        let event = Event::new(principal.id, spec)?;
        self.store.insert_event(&event).await?;

        info!(
            event_id = %event.id,
            owner = %event.owner,
            total_capacity = event.total_capacity,
            "Event created"
        );
        Ok(event)
    }

    /// Apply a partial update to an event
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` per the usual rules; `LockedField` when a
    /// capacity-affecting field would change after sales began.
    pub async fn update(
        &self,
        principal: &Principal,
        event_id: Uuid,
        changes: EventChanges,
    ) -> TicketingResult<Event> {
        let mut event = self
            .store
            .fetch_event(event_id)
            .await?
            .ok_or(TicketingError::NotFound)?;
        authorize::require_owner(&event, principal.id)?;

        if capacity::fields_locked(&event) {
            if let Some(field) = capacity::locked_field_change(&event, &changes) {
                return Err(TicketingError::LockedField {
                    field: field.to_string(),
                });
            }
        }

        // Replacing the image releases the previous reference first.
        if let Some(new_ref) = &changes.image_ref {
            if event.image_ref.as_deref() != Some(new_ref.as_str()) {
                if let Some(old_ref) = event.image_ref.take() {
                    self.release_media(&old_ref).await;
                }
            }
        }

        // Capacity moves through its own conditional write so a first sale
        // landing between our fetch and this update cannot be lost.
        let new_capacity = changes
            .total_capacity
            .filter(|c| *c != event.total_capacity);
        if let Some(total_capacity) = new_capacity {
            capacity::validate_initial_capacity(total_capacity)?;
            self.store.resize_capacity(event.id, total_capacity).await?;
            event.total_capacity = total_capacity;
            event.available_tickets = total_capacity;
        }

        self.apply_changes(&mut event, changes);
        event.updated_at = Utc::now();
        self.store.update_event(&event).await?;

        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Delete an event, its participants, and its stored image
    pub async fn delete(&self, principal: &Principal, event_id: Uuid) -> TicketingResult<()> {
        let event = self
            .store
            .fetch_event(event_id)
            .await?
            .ok_or(TicketingError::NotFound)?;
        authorize::require_owner(&event, principal.id)?;

        if let Some(old_ref) = &event.image_ref {
            self.release_media(old_ref).await;
        }

        if !self.store.delete_event(event_id).await? {
            return Err(TicketingError::NotFound);
        }

        info!(event_id = %event_id, "Event deleted");
        Ok(())
    }

    fn apply_changes(&self, event: &mut Event, changes: EventChanges) {
        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(description) = changes.description {
            event.description = description;
        }
        if let Some(event_date) = changes.event_date {
            event.event_date = event_date;
        }
        if let Some(event_time) = changes.event_time {
            event.event_time = event_time;
        }
        if let Some(location) = changes.location {
            event.location = location;
        }
        if let Some(ticket_price) = changes.ticket_price {
            event.ticket_price = ticket_price;
        }
        if let Some(is_active) = changes.is_active {
            event.is_active = is_active;
        }
        if let Some(image_url) = changes.image_url {
            event.image_url = Some(image_url);
        }
        if let Some(image_ref) = changes.image_ref {
            event.image_ref = Some(image_ref);
        }
    }

    async fn release_media(&self, media_ref: &str) {
        if let Err(e) = self.media.release(media_ref).await {
            warn!(
                media_ref = %media_ref,
                error = %e,
                "Failed to release media reference; continuing"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEventStore;
    use crate::models::{ContactInfo, Role};
    use crate::registration::RegistrationGuard;
    use chrono::Utc;
    use media_store::MemoryMediaStore;

    fn organizer() -> Principal {
        Principal::new(Uuid::new_v4(), Role::Organizer)
    }

    fn spec(capacity: i32) -> NewEvent {
        NewEvent {
            title: "Conference".to_string(),
            description: "Annual gathering".to_string(),
            event_date: Utc::now(),
            event_time: "10:00".to_string(),
            location: "Convention Center".to_string(),
            ticket_price: 99.0,
            total_capacity: capacity,
            image_url: None,
            image_ref: None,
        }
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn customer_cannot_create_event() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let customer = Principal::new(Uuid::new_v4(), Role::Customer);
        let err = coordinator.create(&customer, spec(10)).await.unwrap_err();
        assert!(matches!(err, TicketingError::Forbidden(_)));
    }

    #[tokio::test]
    async fn organizer_creates_with_valid_fields() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let event = coordinator.create(&organizer(), spec(10)).await.unwrap();
        assert_eq!(event.available_tickets, 10);
        assert!(store.fetch_event(event.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete_even_as_admin() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let event = coordinator.create(&organizer(), spec(10)).await.unwrap();
        let admin = Principal::new(Uuid::new_v4(), Role::Admin);

        let changes = EventChanges {
            description: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            coordinator.update(&admin, event.id, changes).await,
            Err(TicketingError::Forbidden(_))
        ));
        assert!(matches!(
            coordinator.delete(&admin, event.id).await,
            Err(TicketingError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn locked_fields_reject_after_first_sale() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let owner = organizer();
        let event = coordinator.create(&owner, spec(10)).await.unwrap();

        let customer = Principal::new(Uuid::new_v4(), Role::Customer);
        RegistrationGuard::new(&store)
            .register(event.id, &customer, contact(), None)
            .await
            .unwrap();

        let err = coordinator
            .update(
                &owner,
                event.id,
                EventChanges {
                    total_capacity: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TicketingError::LockedField {
                field: "total_capacity".to_string()
            }
        );

        // Unrelated fields remain updatable, and the update must not move
        // the ledger back.
        let updated = coordinator
            .update(
                &owner,
                event.id,
                EventChanges {
                    description: Some("New venue map attached".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "New venue map attached");

        let current = store.fetch_event(event.id).await.unwrap().unwrap();
        assert_eq!(current.tickets_sold, 1);
        assert_eq!(current.available_tickets, 9);
        assert_eq!(store.list_participants(event.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn capacity_change_before_sales_resets_ledger() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let owner = organizer();
        let event = coordinator.create(&owner, spec(10)).await.unwrap();

        let updated = coordinator
            .update(
                &owner,
                event.id,
                EventChanges {
                    total_capacity: Some(25),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_capacity, 25);
        assert_eq!(updated.available_tickets, 25);
        assert!(capacity::invariant_holds(&updated));
    }

    #[tokio::test]
    async fn replacing_image_releases_previous_ref_once() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        media.seed("old.jpg");
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let owner = organizer();
        let mut create_spec = spec(10);
        create_spec.image_url = Some("http://cdn/old.jpg".to_string());
        create_spec.image_ref = Some("old.jpg".to_string());
        let event = coordinator.create(&owner, create_spec).await.unwrap();

        let updated = coordinator
            .update(
                &owner,
                event.id,
                EventChanges {
                    image_url: Some("http://cdn/new.jpg".to_string()),
                    image_ref: Some("new.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.image_ref.as_deref(), Some("new.jpg"));
        assert_eq!(media.released(), vec!["old.jpg".to_string()]);
    }

    #[tokio::test]
    async fn delete_releases_image_and_removes_event() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        media.seed("poster.png");
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let owner = organizer();
        let mut create_spec = spec(2);
        create_spec.image_ref = Some("poster.png".to_string());
        let event = coordinator.create(&owner, create_spec).await.unwrap();

        coordinator.delete(&owner, event.id).await.unwrap();

        assert!(store.fetch_event(event.id).await.unwrap().is_none());
        assert_eq!(media.released(), vec!["poster.png".to_string()]);
        assert_eq!(
            coordinator.delete(&owner, event.id).await.unwrap_err(),
            TicketingError::NotFound
        );
    }

    #[tokio::test]
    async fn media_release_failure_does_not_abort_delete() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        media.fail_releases();
        let coordinator = EventMutationCoordinator::new(&store, &media);

        let owner = organizer();
        let mut create_spec = spec(2);
        create_spec.image_ref = Some("poster.png".to_string());
        let event = coordinator.create(&owner, create_spec).await.unwrap();

        coordinator.delete(&owner, event.id).await.unwrap();
        assert!(store.fetch_event(event.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn full_lifecycle_capacity_two() {
        let store = InMemoryEventStore::new();
        let media = MemoryMediaStore::new();
        let coordinator = EventMutationCoordinator::new(&store, &media);
        let guard = RegistrationGuard::new(&store);

        let owner = organizer();
        let event = coordinator.create(&owner, spec(2)).await.unwrap();

        let a = Principal::new(Uuid::new_v4(), Role::Customer);
        let b = Principal::new(Uuid::new_v4(), Role::Customer);
        let c = Principal::new(Uuid::new_v4(), Role::Customer);

        guard.register(event.id, &a, contact(), None).await.unwrap();
        guard.register(event.id, &b, contact(), None).await.unwrap();

        let current = store.fetch_event(event.id).await.unwrap().unwrap();
        assert_eq!(current.available_tickets, 0);
        assert_eq!(current.tickets_sold, 2);

        assert_eq!(
            guard.register(event.id, &c, contact(), None).await.unwrap_err(),
            TicketingError::SoldOut
        );
    }
}
