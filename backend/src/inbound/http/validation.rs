//! Translation of domain validation failures into `400` payloads.
//!
//! Every validation error carries `details` of the form
//! `{"field": ..., "code": ..., "value": ...}` where `value` is omitted when
//! echoing it back would not help the client.

use serde_json::{Value, json};

use crate::domain::{
    CacheValidationError, Error, LoginValidationError, ProfileValidationError,
};

/// Machine-readable validation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    Empty,
    TooLong,
    OutOfRange,
    InvalidEmail,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

fn field_error(message: String, field: &str, code: ValidationCode, value: Option<Value>) -> Error {
    let mut details = json!({ "field": field, "code": code.as_str() });
    if let (Some(value), Some(map)) = (value, details.as_object_mut()) {
        map.insert("value".to_owned(), value);
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn cache_validation_error(err: &CacheValidationError) -> Error {
    let message = err.to_string();
    match err {
        CacheValidationError::EmptyName => {
            field_error(message, "cache_name", ValidationCode::Empty, None)
        }
        CacheValidationError::NameTooLong { .. } => {
            field_error(message, "cache_name", ValidationCode::TooLong, None)
        }
        CacheValidationError::LatitudeOutOfRange(lat) => {
            field_error(message, "lat", ValidationCode::OutOfRange, Some(json!(lat)))
        }
        CacheValidationError::LongitudeOutOfRange(long) => {
            field_error(message, "long", ValidationCode::OutOfRange, Some(json!(long)))
        }
        CacheValidationError::RatingOutOfRange { kind, value } => field_error(
            message,
            kind.field(),
            ValidationCode::OutOfRange,
            Some(json!(value)),
        ),
    }
}

pub(crate) fn profile_validation_error(err: &ProfileValidationError) -> Error {
    let message = err.to_string();
    match err {
        ProfileValidationError::EmptyFirstName => {
            field_error(message, "first_name", ValidationCode::Empty, None)
        }
        ProfileValidationError::EmptyLastName => {
            field_error(message, "last_name", ValidationCode::Empty, None)
        }
        ProfileValidationError::TooLong { field, .. } => {
            field_error(message, field, ValidationCode::TooLong, None)
        }
        ProfileValidationError::InvalidEmail => {
            field_error(message, "email", ValidationCode::InvalidEmail, None)
        }
    }
}

pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(err.to_string(), field, ValidationCode::Empty, None)
}
