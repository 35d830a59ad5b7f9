//! Eventline Server - event management and ticketing API
//!
//! This library provides the core functionality of the Eventline HTTP server,
//! including authentication, authorization, and RESTful API endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::*;
pub use server::{EventlineServer, ServerConfig};

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: EventlineServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
