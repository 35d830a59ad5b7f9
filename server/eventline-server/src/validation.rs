//! Request validation utilities for consistent validation across handlers
//!
//! This module provides a `RequestValidation` trait and helper macros to
//! centralize validation logic and ensure consistent error messages.

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// Implement this trait for all create/update request types to ensure
/// consistent validation across the API.
pub trait RequestValidation {
    /// Validates the request and returns an error if validation fails
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` with a message naming the offending
    /// field.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Macro for validating required fields (non-empty strings)
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Macro for validating numeric ranges
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        validate_field!($field, *$field >= $min && *$field <= $max, $message);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRequest {
        name: String,
        capacity: i32,
    }

    impl RequestValidation for TestRequest {
        fn validate(&self) -> Result<(), ApiError> {
            validate_required!(self.name, "Name is required");
            validate_range!(&self.capacity, 1, 1_000_000, "Capacity out of range");
            Ok(())
        }
    }

    #[test]
    fn valid_request_passes() {
        let req = TestRequest {
            name: "Ada".to_string(),
            capacity: 100,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_name_fails() {
        let req = TestRequest {
            name: "  ".to_string(),
            capacity: 100,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn capacity_out_of_range_fails() {
        let req = TestRequest {
            name: "Ada".to_string(),
            capacity: 0,
        };
        assert!(req.validate().is_err());
    }
}
