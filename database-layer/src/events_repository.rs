//! `EventStore` implementation backed by PostgreSQL
//!
//! The registration path runs inside a transaction: the participant insert
//! hits the `UNIQUE (event_id, user_id)` index first, then a conditional
//! update moves the counter pair only while a ticket remains. Either both
//! rows change or neither does, so concurrent registrations on the same
//! event serialize at the row level without application locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use tracing::debug;
use uuid::Uuid;

use ticketing_core::{Event, EventStore, Participant, TicketingError, TicketingResult};

use crate::connection::DatabasePool;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PgEventStore {
    db: DatabasePool,
}

impl PgEventStore {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    event_date: DateTime<Utc>,
    event_time: String,
    location: String,
    ticket_price: f64,
    total_capacity: i32,
    available_tickets: i32,
    tickets_sold: i32,
    is_active: bool,
    likes: i32,
    image_url: Option<String>,
    image_ref: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            owner: row.owner_id,
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            event_time: row.event_time,
            location: row.location,
            ticket_price: row.ticket_price,
            total_capacity: row.total_capacity,
            available_tickets: row.available_tickets,
            tickets_sold: row.tickets_sold,
            is_active: row.is_active,
            likes: row.likes,
            image_url: row.image_url,
            image_ref: row.image_ref,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ParticipantRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    phone_number: String,
    payment_id: String,
    payment_status: String,
    registered_at: DateTime<Utc>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Participant {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            payment_id: row.payment_id,
            payment_status: row.payment_status,
            registered_at: row.registered_at,
        }
    }
}

fn storage_error(e: sqlx::Error) -> TicketingError {
    TicketingError::storage(e)
}

fn pg_error_code(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.to_string()),
        _ => None,
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert_event(&self, event: &Event) -> TicketingResult<()> {
        sqlx::query(
            r"
            INSERT INTO events (
                id, owner_id, title, description, event_date, event_time,
                location, ticket_price, total_capacity, available_tickets,
                tickets_sold, is_active, likes, image_url, image_ref,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ",
        )
        .bind(event.id)
        .bind(event.owner)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(&event.event_time)
        .bind(&event.location)
        .bind(event.ticket_price)
        .bind(event.total_capacity)
        .bind(event.available_tickets)
        .bind(event.tickets_sold)
        .bind(event.is_active)
        .bind(event.likes)
        .bind(&event.image_url)
        .bind(&event.image_ref)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(self.db.pool())
        .await
        .map_err(storage_error)?;

        debug!(event_id = %event.id, "Inserted event row");
        Ok(())
    }

    async fn fetch_event(&self, id: Uuid) -> TicketingResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(storage_error)?;
        Ok(row.map(Event::from))
    }

    async fn list_active_events(
        &self,
        limit: i64,
        offset: i64,
    ) -> TicketingResult<(Vec<Event>, i64)> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"
            SELECT * FROM events
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await
        .map_err(storage_error)?;

        let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM events WHERE is_active = TRUE")
            .map(|row: PgRow| row.get("count"))
            .fetch_one(self.db.pool())
            .await
            .map_err(storage_error)?;

        Ok((rows.into_iter().map(Event::from).collect(), total))
    }

    async fn list_events_by_owner(&self, owner: Uuid) -> TicketingResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT * FROM events WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(self.db.pool())
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn update_event(&self, event: &Event) -> TicketingResult<()> {
        // The ledger columns are deliberately absent: the caller's snapshot
        // may be stale against a concurrent reservation, and writing them
        // here would roll that reservation back.
        let result = sqlx::query(
            r"
            UPDATE events SET
                title = $2,
                description = $3,
                event_date = $4,
                event_time = $5,
                location = $6,
                ticket_price = $7,
                is_active = $8,
                likes = $9,
                image_url = $10,
                image_ref = $11,
                updated_at = $12
            WHERE id = $1
            ",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(&event.event_time)
        .bind(&event.location)
        .bind(event.ticket_price)
        .bind(event.is_active)
        .bind(event.likes)
        .bind(&event.image_url)
        .bind(&event.image_ref)
        .bind(event.updated_at)
        .execute(self.db.pool())
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(TicketingError::NotFound);
        }
        Ok(())
    }

    async fn resize_capacity(&self, id: Uuid, total_capacity: i32) -> TicketingResult<()> {
        let result = sqlx::query(
            r"
            UPDATE events
            SET total_capacity = $2,
                available_tickets = $2 - tickets_sold,
                updated_at = NOW()
            WHERE id = $1 AND tickets_sold = 0
            ",
        )
        .bind(id)
        .bind(total_capacity)
        .execute(self.db.pool())
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1) AS present")
                    .bind(id)
                    .map(|row: PgRow| row.get("present"))
                    .fetch_one(self.db.pool())
                    .await
                    .map_err(storage_error)?;
            return Err(if exists {
                TicketingError::LockedField {
                    field: "total_capacity".to_string(),
                }
            } else {
                TicketingError::NotFound
            });
        }

        debug!(event_id = %id, total_capacity, "Resized event capacity");
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> TicketingResult<bool> {
        // Participant rows go with the event via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_participants(&self, event_id: Uuid) -> TicketingResult<Vec<Participant>> {
        let rows = sqlx::query_as::<_, ParticipantRow>(
            "SELECT * FROM participants WHERE event_id = $1 ORDER BY registered_at ASC",
        )
        .bind(event_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Participant::from).collect())
    }

    async fn register_participant(&self, participant: &Participant) -> TicketingResult<()> {
        let mut tx = self.db.pool().begin().await.map_err(storage_error)?;

        let insert = sqlx::query(
            r"
            INSERT INTO participants (
                id, event_id, user_id, name, email, phone_number,
                payment_id, payment_status, registered_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(participant.id)
        .bind(participant.event_id)
        .bind(participant.user_id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.phone_number)
        .bind(&participant.payment_id)
        .bind(&participant.payment_status)
        .bind(participant.registered_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            return Err(match pg_error_code(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => TicketingError::AlreadyRegistered,
                Some(FOREIGN_KEY_VIOLATION) => TicketingError::NotFound,
                _ => storage_error(e),
            });
        }

        let reserved = sqlx::query(
            r"
            UPDATE events
            SET available_tickets = available_tickets - 1,
                tickets_sold = tickets_sold + 1,
                updated_at = NOW()
            WHERE id = $1 AND available_tickets > 0
            ",
        )
        .bind(participant.event_id)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if reserved.rows_affected() == 0 {
            tx.rollback().await.map_err(storage_error)?;
            return Err(TicketingError::SoldOut);
        }

        tx.commit().await.map_err(storage_error)?;
        debug!(
            event_id = %participant.event_id,
            participant_id = %participant.id,
            "Reserved ticket and recorded participant"
        );
        Ok(())
    }
}
