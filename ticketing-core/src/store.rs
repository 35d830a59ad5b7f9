//! Storage seam for the ticketing core
//!
//! The event document in durable storage is the single shared mutable
//! resource; request handlers hold no cross-request state. Implementations
//! must make [`EventStore::register_participant`] atomic with respect to
//! concurrent registrations on the same event: in PostgreSQL via a
//! transaction over a unique participant index and a conditional counter
//! update, in memory via a single lock.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TicketingResult;
use crate::models::{Event, Participant};

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a newly created event
    async fn insert_event(&self, event: &Event) -> TicketingResult<()>;

    /// Fetch an event by id, active or not
    async fn fetch_event(&self, id: Uuid) -> TicketingResult<Option<Event>>;

    /// Active events, newest first, with the total count for pagination
    async fn list_active_events(
        &self,
        limit: i64,
        offset: i64,
    ) -> TicketingResult<(Vec<Event>, i64)>;

    /// All events owned by a principal, newest first
    async fn list_events_by_owner(&self, owner: Uuid) -> TicketingResult<Vec<Event>>;

    /// Persist the descriptive fields of an event
    ///
    /// The counter pair and `total_capacity` are never written through
    /// this path: a caller's snapshot may be stale with respect to a
    /// concurrent reservation, and writing counters from it would lose
    /// that reservation. Reservations go through
    /// [`EventStore::register_participant`] and capacity changes through
    /// [`EventStore::resize_capacity`].
    async fn update_event(&self, event: &Event) -> TicketingResult<()>;

    /// Change the total capacity of an event that has not sold any ticket
    ///
    /// Applied as a single conditional write so a concurrent first sale
    /// cannot be lost; on success the ledger resets to
    /// `available_tickets == total_capacity`.
    ///
    /// # Errors
    ///
    /// - `TicketingError::NotFound` when the event does not exist
    /// - `TicketingError::LockedField` when at least one ticket has sold
    ///   by the time the write executes
    async fn resize_capacity(&self, id: Uuid, total_capacity: i32) -> TicketingResult<()>;

    /// Remove an event and its participants; returns whether it existed
    async fn delete_event(&self, id: Uuid) -> TicketingResult<bool>;

    /// Participants of an event in registration order
    async fn list_participants(&self, event_id: Uuid) -> TicketingResult<Vec<Participant>>;

    /// Atomically reserve one ticket and append the participant
    ///
    /// All-or-nothing: either the counter pair moves by one and the
    /// participant is recorded, or nothing changes.
    ///
    /// # Errors
    ///
    /// - `TicketingError::NotFound` when the event does not exist
    /// - `TicketingError::AlreadyRegistered` when the user already holds a
    ///   registration (including when it lost a same-user race)
    /// - `TicketingError::SoldOut` when no ticket remained at the moment of
    ///   the conditional update
    async fn register_participant(&self, participant: &Participant) -> TicketingResult<()>;
}
