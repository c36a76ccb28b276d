//! Response - hosting boundary で返す status / headers / body
//!
//! body は projection 済みの JSON です。`content-type` は常に
//! `application/json` で、呼び出し側から上書きできません。

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, RETRY_AFTER};
use http::HeaderMap;
use serde_json::Value;

use super::options::ProjectionOptions;
use super::projector::project;
use crate::domain::{Failure, FailureKind, Outcome, ResultError, StatusCode, reason_phrase};
use crate::typed::DispatchError;

/// Retry-After seconds used by [`Response::service_unavailable`] when none is given.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 120;

pub const DEFAULT_OK_MESSAGE: &str = "OK";

const CANCELLED_MESSAGE: &str = "The request was cancelled.";

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Value>,
}

impl Response {
    fn new(status: StatusCode, body: Option<Value>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Status from the outcome, body from its projected envelope.
    ///
    /// 204 and 304 never carry a body.
    pub fn from_outcome(outcome: &Outcome, options: &ProjectionOptions) -> Self {
        let status = outcome.status();
        let body = match status {
            StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED => None,
            _ => Some(project(outcome, options).to_json(options.naming)),
        };
        Self::new(status, body)
    }

    /// Generic fault response for a failed dispatch.
    ///
    /// Fault details stay in the logs; the body only carries the generic message.
    pub fn from_dispatch_error(error: &DispatchError, options: &ProjectionOptions) -> Self {
        let failure = match error {
            DispatchError::Cancelled => Failure::with_status(
                ResultError::plain(CANCELLED_MESSAGE),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            DispatchError::HandlerNotFound { .. }
            | DispatchError::HandlerFault(_)
            | DispatchError::BindingMismatch { .. } => Failure::of(FailureKind::Fault),
        };
        Self::from_outcome(&Outcome::failure(failure), options)
    }

    /// 503 with a `Retry-After` header.
    pub fn service_unavailable(retry_after: Option<u64>) -> Self {
        let secs = retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        let mut response = Self::new(StatusCode::SERVICE_UNAVAILABLE, Some(empty_object()));
        response.headers.insert(RETRY_AFTER, HeaderValue::from(secs));
        response
    }

    /// 200 with `{message}`; an empty message yields `{}`.
    pub fn ok_message(message: impl Into<String>, options: &ProjectionOptions) -> Self {
        Self::from_outcome(&Outcome::message_only(message), options)
    }

    pub fn ok(options: &ProjectionOptions) -> Self {
        Self::ok_message(DEFAULT_OK_MESSAGE, options)
    }

    /// Add a header. `content-type` is fixed and silently kept.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        if name != CONTENT_TYPE {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &'static str {
        reason_phrase(self.status.as_u16())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Serialized body; empty when there is no body.
    pub fn to_body_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match &self.body {
            Some(body) => serde_json::to_vec(body),
            None => Ok(Vec::new()),
        }
    }

    pub fn into_http(self) -> Result<http::Response<Vec<u8>>, serde_json::Error> {
        let body = self.to_body_bytes()?;
        let mut response = http::Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        Ok(response)
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
