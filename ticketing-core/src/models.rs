use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::capacity;
use crate::error::{TicketingError, TicketingResult};

/// Role of an authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TicketingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(TicketingError::validation(format!(
                "Unknown role: {other}"
            ))),
        }
    }
}

/// Authenticated actor making a request
///
/// Issued by the external identity provider; the core only consumes the
/// `(id, role)` pair plus an optional display name used as a contact
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub name: Option<String>,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self {
            id,
            role,
            name: None,
        }
    }
}

/// A ticketed event with a fixed total capacity and a decrementing
/// availability counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    /// Creating principal; immutable after creation
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    /// Locked field: immutable once any ticket has sold
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    /// Locked field: immutable once any ticket has sold
    pub ticket_price: f64,
    /// Locked field: immutable once any ticket has sold
    pub total_capacity: i32,
    pub available_tickets: i32,
    pub tickets_sold: i32,
    /// Inactive events are excluded from public listings but remain
    /// addressable by id
    pub is_active: bool,
    pub likes: i32,
    pub image_url: Option<String>,
    /// Opaque reference into the media storage collaborator; released when
    /// replaced or when the event is deleted
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event owned by `owner`, initializing the capacity ledger
    ///
    /// # Errors
    ///
    /// Returns `TicketingError::Validation` when `total_capacity` is not
    /// positive or required fields are empty.
    pub fn new(owner: Uuid, spec: NewEvent) -> TicketingResult<Self> {
        capacity::validate_initial_capacity(spec.total_capacity)?;
        spec.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            title: spec.title,
            description: spec.description,
            event_date: spec.event_date,
            event_time: spec.event_time,
            location: spec.location,
            ticket_price: spec.ticket_price,
            total_capacity: spec.total_capacity,
            available_tickets: spec.total_capacity,
            tickets_sold: 0,
            is_active: true,
            likes: 0,
            image_url: spec.image_url,
            image_ref: spec.image_ref,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields supplied when creating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub ticket_price: f64,
    pub total_capacity: i32,
    pub image_url: Option<String>,
    pub image_ref: Option<String>,
}

impl NewEvent {
    fn validate(&self) -> TicketingResult<()> {
        if self.title.trim().is_empty() {
            return Err(TicketingError::validation("Title is required"));
        }
        if self.location.trim().is_empty() {
            return Err(TicketingError::validation("Location is required"));
        }
        if self.ticket_price < 0.0 {
            return Err(TicketingError::validation(
                "Ticket price must not be negative",
            ));
        }
        Ok(())
    }
}

/// Partial update applied to an existing event
///
/// `None` means "leave unchanged". Locked fields are rejected by the
/// coordinator once sales have begun, but only when the new value actually
/// differs from the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub ticket_price: Option<f64>,
    pub total_capacity: Option<i32>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
    pub image_ref: Option<String>,
}

/// Contact snapshot captured at registration time
///
/// Not re-synced with later profile changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl ContactInfo {
    pub(crate) fn validate(&self) -> TicketingResult<()> {
        if self.name.trim().is_empty() {
            return Err(TicketingError::validation("Name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(TicketingError::validation("Email is required"));
        }
        if self.phone_number.trim().is_empty() {
            return Err(TicketingError::validation("Phone number is required"));
        }
        Ok(())
    }
}

/// Payment status recorded on a participant
///
/// There is no payment state machine in this system: registrations are
/// recorded as completed, with an external payment reference or a generated
/// placeholder.
pub const PAYMENT_STATUS_COMPLETED: &str = "completed";

/// A record of one successful registration against an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Registering principal; required, and unique per event
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub payment_id: String,
    pub payment_status: String,
    /// Set once at registration, immutable
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(
        event_id: Uuid,
        user_id: Uuid,
        contact: ContactInfo,
        payment_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            name: contact.name,
            email: contact.email,
            phone_number: contact.phone_number,
            payment_id: payment_id
                .unwrap_or_else(|| format!("manual-{}", Uuid::new_v4())),
            payment_status: PAYMENT_STATUS_COMPLETED.to_string(),
            registered_at: Utc::now(),
        }
    }
}
