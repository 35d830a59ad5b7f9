//! Ticket inventory and registration core for Eventline Engine
//!
//! This crate owns the rules that must hold for every event regardless of
//! transport or storage backend:
//!
//! - **Capacity ledger**: `tickets_sold + available_tickets ==
//!   total_capacity` at all times, and `available_tickets` never goes
//!   negative. Reservations are a single atomic conditional update at the
//!   storage boundary, never a read-modify-write in application code.
//! - **Registration guard**: at most one registration per user per event,
//!   serialized with the capacity reservation.
//! - **Ownership/role authorizer**: one predicate pair consumed by every
//!   mutation path.
//! - **Event mutation coordinator**: create/update/delete orchestration,
//!   including the locked-field rule and media cleanup.
//!
//! Storage is abstracted behind [`store::EventStore`]; the PostgreSQL
//! implementation lives in `database-layer`, and [`memory`] provides an
//! in-memory implementation with the same atomicity guarantees for tests.

pub mod authorize;
pub mod capacity;
pub mod coordinator;
pub mod error;
pub mod memory;
pub mod models;
pub mod registration;
pub mod store;

pub use coordinator::EventMutationCoordinator;
pub use error::{TicketingError, TicketingResult};
pub use memory::InMemoryEventStore;
pub use models::{ContactInfo, Event, EventChanges, NewEvent, Participant, Principal, Role};
pub use registration::RegistrationGuard;
pub use store::EventStore;
