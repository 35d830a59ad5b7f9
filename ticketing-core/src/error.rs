use thiserror::Error;

/// Error taxonomy for the ticketing core
///
/// All variants except `Storage` are recoverable by the caller: correct the
/// input or retry with different parameters. `Storage` wraps unexpected
/// persistence failures and is surfaced as a generic internal error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketingError {
    /// No valid principal attached to the request
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Principal lacks the role or ownership required for the operation
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Event does not exist
    #[error("Event not found")]
    NotFound,

    /// Missing or invalid input fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempt to change a capacity-affecting field after sales began
    #[error("Cannot modify {field} after tickets have been sold")]
    LockedField { field: String },

    /// No tickets remained at reservation time
    #[error("Event is sold out")]
    SoldOut,

    /// The user already holds a registration for this event
    #[error("User is already registered for this event")]
    AlreadyRegistered,

    /// Unexpected storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TicketingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn storage(message: impl std::fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }
}

/// Result type alias for ticketing operations
pub type TicketingResult<T> = Result<T, TicketingError>;
