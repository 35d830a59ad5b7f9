//! PostgreSQL persistence for the ticketing core
//!
//! Provides the connection pool, schema migrations, and the
//! [`ticketing_core::EventStore`] implementation backed by the `events` and
//! `participants` tables.

pub mod connection;
pub mod error;
pub mod events_repository;

pub use connection::DatabasePool;
pub use error::{DatabaseError, DatabaseResult};
pub use events_repository::PgEventStore;
