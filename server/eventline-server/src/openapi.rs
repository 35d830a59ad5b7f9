use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::EventlineServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,
        crate::handlers::health::version_info,

        // Event endpoints
        crate::handlers::events::create_event,
        crate::handlers::events::list_events,
        crate::handlers::events::get_event,
        crate::handlers::events::my_events,
        crate::handlers::events::update_event,
        crate::handlers::events::delete_event,
        crate::handlers::events::register_for_event,
    ),
    components(
        schemas(
            // Health schemas
            crate::handlers::health::HealthResponse,
            crate::handlers::health::VersionResponse,

            // Event schemas
            crate::handlers::events::CreateEventRequest,
            crate::handlers::events::UpdateEventRequest,
            crate::handlers::events::RegisterRequest,
            crate::handlers::events::EventResponse,
            crate::handlers::events::ParticipantResponse,
            crate::handlers::events::ListEventsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "System health and status endpoints"),
        (name = "events", description = "Event management and ticket inventory"),
        (name = "registrations", description = "Ticket registration and participants"),
    ),
    info(
        title = "Eventline Engine API",
        version = "1.0.0",
        description = "Event management platform API providing ticket inventory, registrations, and event lifecycle management.",
        contact(
            name = "Eventline Team",
            email = "team@eventline.dev",
            url = "https://eventline.dev"
        ),
        license(
            name = "AGPL-3.0-only",
            url = "https://github.com/eventline-hq/eventline-engine/blob/main/LICENSE"
        ),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
        (url = "https://api.eventline.dev", description = "Production server"),
    ),
)]
pub struct ApiDoc;

/// Registers the bearer token security scheme referenced by the endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create OpenAPI documentation routes
pub fn create_docs_routes() -> Router<EventlineServer> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
