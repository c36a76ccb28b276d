//! Outcome model: the unified success/failure value returned by handler logic.
//!
//! The untyped [`Outcome`] carries its payload as an opaque `serde_json::Value`
//! tagged by shape ([`Payload`]). Typed views live in [`super::typed_outcome`]
//! and are reached through explicit, fallible conversions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ResultError;
use super::failure::Failure;
use super::status::{StatusCode, is_error_class};

/// Message used by [`Outcome::ok`].
pub const OK_MESSAGE: &str = "Ok";

/// One page of a larger dataset.
///
/// `total_count` and `page_count` describe the entire dataset and are
/// independent of `items.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_count: u64) -> Self {
        Self {
            items,
            total_count,
            page_count,
        }
    }
}

/// Shape of an outcome payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Object(Value),
    Collection(Vec<Value>),
    Paginated(Page<Value>),
}

impl Payload {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Collection(_) => "collection",
            Self::Paginated(_) => "paginated",
        }
    }
}

/// Untyped outcome.
///
/// Invariant: when `error` is set, `status` is a 4xx/5xx code. An error
/// outcome may still carry a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    status: StatusCode,
    payload: Option<Payload>,
    message: Option<String>,
    error: Option<ResultError>,
}

impl Outcome {
    /// Success carrying an object payload. `Value::Null` means "no payload".
    pub fn success(data: Value) -> Self {
        let payload = match data {
            Value::Null => None,
            other => Some(Payload::Object(other)),
        };
        Self {
            status: StatusCode::OK,
            payload,
            message: None,
            error: None,
        }
    }

    /// 201 Created with an object payload.
    pub fn created(data: Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    /// Message-only success with the default `"Ok"` message.
    pub fn ok() -> Self {
        Self::message_only(OK_MESSAGE)
    }

    /// Message-only success.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            payload: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// 204-style success without payload or message.
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            payload: None,
            message: None,
            error: None,
        }
    }

    pub fn collection<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            status: StatusCode::OK,
            payload: Some(Payload::Collection(items.into_iter().collect())),
            message: None,
            error: None,
        }
    }

    pub fn paginated<I>(items: I, total_count: u64, page_count: u64) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            status: StatusCode::OK,
            payload: Some(Payload::Paginated(Page::new(
                items.into_iter().collect(),
                total_count,
                page_count,
            ))),
            message: None,
            error: None,
        }
    }

    /// Failure outcome. No payload is attached; data-bearing errors keep their
    /// data inside the error.
    pub fn failure(failure: impl Into<Failure>) -> Self {
        let failure = failure.into();
        let (status, error) = failure.into_parts();
        let message = Some(error.message().to_string()).filter(|m| !m.is_empty());
        Self {
            status,
            payload: None,
            message,
            error: Some(error),
        }
    }

    /// Assemble an outcome from already validated parts.
    ///
    /// An error paired with a non-error status is moved to 500 to keep the
    /// status/error invariant.
    pub(crate) fn from_parts(
        status: StatusCode,
        payload: Option<Payload>,
        message: Option<String>,
        error: Option<ResultError>,
    ) -> Self {
        let status = match &error {
            Some(_) if !is_error_class(status) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => status,
        };
        Self {
            status,
            payload,
            message,
            error,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Override the status of a successful outcome.
    ///
    /// Ignored for error outcomes whose status would leave the 4xx/5xx class.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        if self.error.is_none() || is_error_class(status) {
            self.status = status;
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&ResultError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(
        self,
    ) -> (
        StatusCode,
        Option<Payload>,
        Option<String>,
        Option<ResultError>,
    ) {
        (self.status, self.payload, self.message, self.error)
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        Self::failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_sets_ok_status_and_no_error() {
        let o = Outcome::success(json!({ "id": 1 }));
        assert_eq!(o.status(), StatusCode::OK);
        assert!(o.is_success());
        assert_eq!(o.payload(), Some(&Payload::Object(json!({ "id": 1 }))));
    }

    #[test]
    fn null_data_means_no_payload() {
        let o = Outcome::success(Value::Null);
        assert!(o.payload().is_none());
        assert_eq!(o.status(), StatusCode::OK);
    }

    #[test]
    fn ok_uses_default_message() {
        let o = Outcome::ok();
        assert_eq!(o.message(), Some(OK_MESSAGE));
        assert!(o.payload().is_none());
    }

    #[test]
    fn empty_message_is_kept_as_given() {
        let o = Outcome::message_only("");
        assert_eq!(o.message(), Some(""));
    }

    #[test]
    fn failure_copies_error_message_and_has_no_payload() {
        let o = Outcome::failure(Failure::business_rule_violated("user is locked"));
        assert_eq!(o.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(o.message(), Some("user is locked"));
        assert_eq!(o.error(), Some(&ResultError::plain("user is locked")));
        assert!(o.payload().is_none());
        assert!(!o.is_success());
    }

    #[test]
    fn failure_with_empty_message_omits_outcome_message() {
        let o = Outcome::failure(Failure::failure(""));
        assert_eq!(o.message(), None);
        assert_eq!(o.error().map(|e| e.message()), Some(""));
    }

    #[test]
    fn error_outcome_status_cannot_leave_error_class() {
        let o = Outcome::failure(Failure::not_found("gone")).with_status(StatusCode::OK);
        assert_eq!(o.status(), StatusCode::NOT_FOUND);

        let o = Outcome::from_parts(StatusCode::OK, None, None, Some(ResultError::plain("x")));
        assert_eq!(o.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn paginated_totals_are_independent_of_items() {
        let o = Outcome::paginated((0..7).map(|i| json!(i)), 47, 5);
        match o.payload() {
            Some(Payload::Paginated(page)) => {
                assert_eq!(page.items.len(), 7);
                assert_eq!(page.total_count, 47);
                assert_eq!(page.page_count, 5);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
