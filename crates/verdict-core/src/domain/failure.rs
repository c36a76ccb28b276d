//! Failure - canonical failure factories with fixed status classes.
//!
//! A [`Failure`] is a status + [`ResultError`] pair that converts into every
//! outcome type (`Outcome`, `TypedOutcome<T>`, `CollectionOutcome<T>`,
//! `PaginatedOutcome<T>`), so handler code writes the same factory call
//! regardless of its result type:
//!
//! ```ignore
//! return Ok(Failure::not_found("user 42 does not exist").into());
//! ```

use serde_json::Value;

use super::errors::{FieldErrors, ResultError};
use super::status::{StatusCode, is_error_class};

/// The canonical failure classes and their status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    BusinessRuleViolated,
    ValidationFailed,
    Fault,
}

impl FailureKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest | Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::BusinessRuleViolated => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Fault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when the caller does not supply one.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Unauthorized access.",
            Self::Forbidden => "Forbidden access.",
            Self::NotFound => "The requested resource was not found.",
            Self::Conflict => "Conflict occurred.",
            Self::BusinessRuleViolated => "Business rule violated.",
            Self::ValidationFailed => "Validation failed",
            Self::Fault => "An unexpected error occurred.",
        }
    }
}

/// A failure ready to be turned into an outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    status: StatusCode,
    error: ResultError,
}

impl Failure {
    /// Failure with an explicit status.
    ///
    /// Statuses outside 4xx/5xx are replaced by 500 so an error never rides on
    /// a success code.
    pub fn with_status(error: ResultError, status: StatusCode) -> Self {
        let status = if is_error_class(status) {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { status, error }
    }

    /// Canonical failure with its default message.
    pub fn of(kind: FailureKind) -> Self {
        Self::kind(kind, kind.default_message())
    }

    fn kind(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::with_status(ResultError::plain(message), kind.status())
    }

    /// Generic domain failure (422).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::BusinessRuleViolated, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::Conflict, message)
    }

    pub fn business_rule_violated(message: impl Into<String>) -> Self {
        Self::kind(FailureKind::BusinessRuleViolated, message)
    }

    /// Validation failure (400) carrying a field → messages map.
    pub fn validation_failed(errors: FieldErrors, message: Option<String>) -> Self {
        Self::with_status(
            ResultError::validation(errors, message),
            FailureKind::ValidationFailed.status(),
        )
    }

    /// Failure whose error carries structured data.
    pub fn with_data(status: StatusCode, data: Value, message: Option<String>) -> Self {
        Self::with_status(ResultError::with_data(data, message), status)
    }

    /// 500 failure capturing a Rust error's message.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::with_status(ResultError::from_error(err), FailureKind::Fault.status())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &ResultError {
        &self.error
    }

    pub fn into_parts(self) -> (StatusCode, ResultError) {
        (self.status, self.error)
    }
}

/// A bare error becomes a generic domain failure (422).
impl From<ResultError> for Failure {
    fn from(error: ResultError) -> Self {
        Self::with_status(error, FailureKind::BusinessRuleViolated.status())
    }
}
