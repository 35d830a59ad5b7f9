use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers::{events, health},
    openapi,
    server::EventlineServer,
};

/// Create health check routes
pub fn health_routes() -> Router<EventlineServer> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/version", get(health::version_info))
}

/// Create event and registration routes
pub fn event_routes() -> Router<EventlineServer> {
    Router::new()
        .route("/events", get(events::list_events))
        .route("/events", post(events::create_event))
        .route("/events/my", get(events::my_events))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id", put(events::update_event))
        .route("/events/:id", delete(events::delete_event))
        .route("/events/:id/register", post(events::register_for_event))
}

/// All versioned API routes
pub fn api_v1_routes() -> Router<EventlineServer> {
    Router::new().nest("/api/v1", event_routes())
}

/// Create the full route tree
pub fn create_routes() -> Router<EventlineServer> {
    Router::new()
        .merge(health_routes())
        .merge(api_v1_routes())
        .merge(openapi::create_docs_routes())
}
