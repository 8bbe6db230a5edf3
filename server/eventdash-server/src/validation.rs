//! Request validation utilities for consistent validation across handlers

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// Implement this for request types so handlers can run one `validate()`
/// call before touching the store.
pub trait RequestValidation {
    /// Returns `Ok(())` if validation passes, or an [`ApiError::Validation`]
    /// with a specific message otherwise.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
#[macro_export]
macro_rules! validate_field {
    ($predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Macro for validating required fields (non-empty strings)
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        $crate::validate_field!(!$field.trim().is_empty(), $message);
    };
}
