use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use ticketing_core::TicketingError;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Stable machine-readable code from `error_common::codes`
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Authorization error: {message}")]
    Authorization { message: String },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Cannot modify {field} after tickets have been sold")]
    LockedField { field: String },

    #[error("Event is sold out")]
    SoldOut,

    #[error("User is already registered for this event")]
    AlreadyRegistered,

    #[error("Database error: {0}")]
    Database(#[from] database_layer::DatabaseError),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Create a validation error with field-specific errors
    pub fn validation_with_fields(
        message: impl Into<String>,
        field_errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Authorization { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::LockedField { .. } => StatusCode::CONFLICT,
            ApiError::SoldOut => StatusCode::CONFLICT,
            ApiError::AlreadyRegistered => StatusCode::CONFLICT,
            ApiError::Database(db_err) => match db_err {
                database_layer::DatabaseError::ConnectionFailed(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::LockedField { .. } => "locked_field",
            ApiError::SoldOut => "sold_out",
            ApiError::AlreadyRegistered => "already_registered",
            ApiError::Database(_) => "database_error",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    /// Get the stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        use error_common::codes;

        match self {
            ApiError::Validation { .. } => codes::validation::INVALID_INPUT,
            ApiError::Authentication { .. } => codes::authentication::INVALID_CREDENTIALS,
            ApiError::Authorization { .. } => codes::authorization::ACCESS_DENIED,
            ApiError::NotFound { .. } => codes::resource::NOT_FOUND,
            ApiError::LockedField { .. } => codes::ticketing::LOCKED_FIELD,
            ApiError::SoldOut => codes::ticketing::SOLD_OUT,
            ApiError::AlreadyRegistered => codes::ticketing::ALREADY_REGISTERED,
            ApiError::Database(db_err) => match db_err {
                database_layer::DatabaseError::ConnectionFailed(_) => {
                    codes::database::CONNECTION_FAILED
                }
                _ => codes::database::QUERY_FAILED,
            },
            ApiError::Internal { .. } => codes::internal::UNEXPECTED,
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Check the request payload for invalid fields".to_string(),
                "Ensure all required fields are provided".to_string(),
            ]),
            ApiError::Authentication { .. } => Some(vec![
                "Verify your authentication credentials".to_string(),
                "Check if your token has expired".to_string(),
            ]),
            ApiError::Authorization { .. } => Some(vec![
                "Verify you have the required permissions".to_string(),
                "Check if your role allows this operation".to_string(),
            ]),
            ApiError::NotFound { .. } => Some(vec![
                "Verify the resource ID is correct".to_string(),
                "Check if the resource exists".to_string(),
            ]),
            ApiError::LockedField { .. } => Some(vec![
                "Capacity, price, and date cannot change once tickets have sold".to_string(),
            ]),
            ApiError::SoldOut => Some(vec![
                "Check back later in case a new capacity is published".to_string(),
            ]),
            _ => None,
        }
    }
}

impl From<TicketingError> for ApiError {
    fn from(err: TicketingError) -> Self {
        match err {
            TicketingError::Unauthorized(message) => ApiError::Authentication { message },
            TicketingError::Forbidden(message) => ApiError::Authorization { message },
            TicketingError::NotFound => ApiError::not_found("event"),
            TicketingError::Validation(message) => ApiError::validation(message),
            TicketingError::LockedField { field } => ApiError::LockedField { field },
            TicketingError::SoldOut => ApiError::SoldOut,
            TicketingError::AlreadyRegistered => ApiError::AlreadyRegistered,
            TicketingError::Storage(message) => ApiError::internal(message),
        }
    }
}

/// Convert anyhow errors to API errors
impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal {
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Log the error with correlation ID
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            status_code = %status_code.as_u16(),
            error = %self,
            "API error occurred"
        );

        let field_errors = match &self {
            ApiError::Validation { field_errors, .. } => field_errors.clone(),
            _ => None,
        };

        // Don't expose internal details in responses
        let message = match &self {
            ApiError::Database(_) => "Database operation failed. Please try again.".to_string(),
            ApiError::Internal { .. } => "An internal error occurred.".to_string(),
            _ => self.to_string(),
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            code: self.error_code().to_string(),
            message,
            field_errors,
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::codes;

    #[test]
    fn every_variant_carries_a_stable_code() {
        assert_eq!(
            ApiError::validation("bad").error_code(),
            codes::validation::INVALID_INPUT
        );
        assert_eq!(
            ApiError::authentication("no token").error_code(),
            codes::authentication::INVALID_CREDENTIALS
        );
        assert_eq!(
            ApiError::authorization("not yours").error_code(),
            codes::authorization::ACCESS_DENIED
        );
        assert_eq!(
            ApiError::not_found("event").error_code(),
            codes::resource::NOT_FOUND
        );
        assert_eq!(ApiError::SoldOut.error_code(), codes::ticketing::SOLD_OUT);
        assert_eq!(
            ApiError::AlreadyRegistered.error_code(),
            codes::ticketing::ALREADY_REGISTERED
        );
        assert_eq!(
            ApiError::LockedField {
                field: "ticket_price".to_string()
            }
            .error_code(),
            codes::ticketing::LOCKED_FIELD
        );
        assert_eq!(
            ApiError::internal("boom").error_code(),
            codes::internal::UNEXPECTED
        );
    }

    #[test]
    fn conflict_kinds_map_to_409() {
        assert_eq!(ApiError::SoldOut.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::AlreadyRegistered.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::LockedField {
                field: "event_date".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }
}
