use axum::{extract::State, response::Json};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::ApiResult;
use crate::server::EventlineServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(server): State<EventlineServer>,
) -> ApiResult<Json<HealthResponse>> {
    let mut checks = HashMap::new();

    match &server.db {
        Some(db) => {
            let state = if db.is_healthy().await {
                "healthy"
            } else {
                "unhealthy"
            };
            checks.insert("database".to_string(), state.to_string());
        }
        None => {
            checks.insert("database".to_string(), "not configured".to_string());
        }
    }
    checks.insert("media_storage".to_string(), "healthy".to_string());

    let status = if checks.values().any(|v| v == "unhealthy") {
        "degraded"
    } else {
        "healthy"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: server.uptime_seconds(),
        checks,
    }))
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    responses(
        (status = 200, description = "Version information", body = VersionResponse)
    ),
    tag = "health"
)]
pub async fn version_info(State(server): State<EventlineServer>) -> ApiResult<Json<VersionResponse>> {
    Ok(Json(VersionResponse {
        name: server.config.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: vec![
            "ticket-inventory".to_string(),
            "registrations".to_string(),
            "media-storage".to_string(),
            "openapi-docs".to_string(),
        ],
    }))
}
