//! Event and registration endpoints
//!
//! Thin HTTP layer over the ticketing core: handlers validate the payload,
//! extract the principal, and delegate to the mutation coordinator or the
//! registration guard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ticketing_core::{
    ContactInfo, Event, EventChanges, EventMutationCoordinator, NewEvent, Participant,
    RegistrationGuard,
};

use crate::error::{api_success, ApiError, ApiResponse, ApiResult};
use crate::middleware::auth_context::AuthContext;
use crate::server::EventlineServer;
use crate::types::PaginationParams;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_range, validate_required};

/// Request payload for creating an event
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub ticket_price: f64,
    pub total_capacity: i32,
    pub image_url: Option<String>,
    pub image_ref: Option<String>,
}

impl RequestValidation for CreateEventRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.title, "Title is required");
        validate_required!(self.location, "Location is required");
        validate_field!(
            self.ticket_price,
            self.ticket_price >= 0.0,
            "Ticket price must not be negative"
        );
        validate_range!(
            &self.total_capacity,
            1,
            1_000_000,
            "Total capacity must be between 1 and 1000000"
        );
        Ok(())
    }
}

/// Request payload for updating an event; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
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

impl RequestValidation for UpdateEventRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validate_required!(title, "Title must not be empty");
        }
        if let Some(location) = &self.location {
            validate_required!(location, "Location must not be empty");
        }
        if let Some(price) = self.ticket_price {
            validate_field!(price, price >= 0.0, "Ticket price must not be negative");
        }
        if let Some(capacity) = &self.total_capacity {
            validate_range!(
                capacity,
                1,
                1_000_000,
                "Total capacity must be between 1 and 1000000"
            );
        }
        Ok(())
    }
}

impl From<UpdateEventRequest> for EventChanges {
    fn from(req: UpdateEventRequest) -> Self {
        EventChanges {
            title: req.title,
            description: req.description,
            event_date: req.event_date,
            event_time: req.event_time,
            location: req.location,
            ticket_price: req.ticket_price,
            total_capacity: req.total_capacity,
            is_active: req.is_active,
            image_url: req.image_url,
            image_ref: req.image_ref,
        }
    }
}

/// Request payload for registering for an event
///
/// Contact details are checked by the registration guard itself, after the
/// duplicate check, so a repeat registrant hears `already_registered` rather
/// than a field complaint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// External payment reference; a placeholder is generated when absent
    pub payment_id: Option<String>,
}

/// Public representation of an event
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub ticket_price: f64,
    pub total_capacity: i32,
    pub available_tickets: i32,
    pub tickets_sold: i32,
    pub is_active: bool,
    pub likes: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            owner: event.owner,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            event_time: event.event_time,
            location: event.location,
            ticket_price: event.ticket_price,
            total_capacity: event.total_capacity,
            available_tickets: event.available_tickets,
            tickets_sold: event.tickets_sold,
            is_active: event.is_active,
            likes: event.likes,
            image_url: event.image_url,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Public representation of a registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub payment_id: String,
    pub payment_status: String,
    pub registered_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            event_id: p.event_id,
            user_id: p.user_id,
            name: p.name,
            email: p.email,
            payment_id: p.payment_id,
            payment_status: p.payment_status,
            registered_at: p.registered_at,
        }
    }
}

/// Paginated event listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListEventsResponse {
    pub events: Vec<EventResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = EventResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient role")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(server): State<EventlineServer>,
    auth: AuthContext,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EventResponse>>)> {
    req.validate()?;

    let spec = NewEvent {
        title: req.title,
        description: req.description,
        event_date: req.event_date,
        event_time: req.event_time,
        location: req.location,
        ticket_price: req.ticket_price,
        total_capacity: req.total_capacity,
        image_url: req.image_url,
        image_ref: req.image_ref,
    };

    let coordinator = EventMutationCoordinator::new(server.store.as_ref(), server.media.as_ref());
    let event = coordinator.create(&auth.principal(), spec).await?;

    Ok((
        StatusCode::CREATED,
        Json(api_success(EventResponse::from(event))),
    ))
}

/// List active events, newest first
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(PaginationParams),
    responses(
        (status = 200, description = "Events retrieved successfully", body = ListEventsResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(server): State<EventlineServer>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<ListEventsResponse>>> {
    let (events, total) = server
        .store
        .list_active_events(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(api_success(ListEventsResponse {
        events: events.into_iter().map(EventResponse::from).collect(),
        total,
        page: pagination.page(),
        page_size: pagination.page_size(),
        total_pages: pagination.total_pages(total),
    })))
}

/// Get a single event by id
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event retrieved successfully", body = EventResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(server): State<EventlineServer>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<EventResponse>>> {
    let event = server
        .store
        .fetch_event(id)
        .await?
        .ok_or_else(|| ApiError::not_found("event"))?;

    Ok(Json(api_success(EventResponse::from(event))))
}

/// List events owned by the authenticated principal
#[utoipa::path(
    get,
    path = "/api/v1/events/my",
    responses(
        (status = 200, description = "Owned events retrieved successfully", body = Vec<EventResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn my_events(
    State(server): State<EventlineServer>,
    auth: AuthContext,
) -> ApiResult<Json<ApiResponse<Vec<EventResponse>>>> {
    let events = server.store.list_events_by_owner(auth.user_id).await?;
    Ok(Json(api_success(
        events.into_iter().map(EventResponse::from).collect(),
    )))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the event owner"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Field locked after first sale")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(server): State<EventlineServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<ApiResponse<EventResponse>>> {
    req.validate()?;

    let coordinator = EventMutationCoordinator::new(server.store.as_ref(), server.media.as_ref());
    let event = coordinator
        .update(&auth.principal(), id, EventChanges::from(req))
        .await?;

    Ok(Json(api_success(EventResponse::from(event))))
}

/// Delete an event and its registrations
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the event owner"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(server): State<EventlineServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let coordinator = EventMutationCoordinator::new(server.store.as_ref(), server.media.as_ref());
    coordinator.delete(&auth.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register the authenticated user for an event
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/register",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration completed", body = ParticipantResponse),
        (status = 400, description = "Invalid contact details"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Sold out or already registered")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn register_for_event(
    State(server): State<EventlineServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParticipantResponse>>)> {
    let contact = ContactInfo {
        name: req.name,
        email: req.email,
        phone_number: req.phone_number,
    };

    let guard = RegistrationGuard::new(server.store.as_ref());
    let participant = guard
        .register(id, &auth.principal(), contact, req.payment_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(api_success(ParticipantResponse::from(participant))),
    ))
}
