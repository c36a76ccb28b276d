//! Response envelopes.
//!
//! The `Serialize` impls emit the canonical camelCase keys. `to_json` applies
//! a [`NamingPolicy`] on top of that.

use serde::Serialize;
use serde_json::{Map, Value};

use super::naming::NamingPolicy;
use crate::domain::errors::render_field_errors;
use crate::domain::{FieldErrors, ResultError};

/// Wire form of a [`ResultError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Plain { message: String },
    WithData { message: String, data: Value },
    /// The field map itself, without a wrapping key.
    Validation(FieldErrors),
}

impl From<&ResultError> for ErrorPayload {
    fn from(error: &ResultError) -> Self {
        match error {
            ResultError::Plain { message } => Self::Plain {
                message: message.clone(),
            },
            ResultError::WithData { message, data } => Self::WithData {
                message: message.clone(),
                data: data.clone(),
            },
            ResultError::Validation { errors, .. } => Self::Validation(errors.clone()),
        }
    }
}

impl ErrorPayload {
    /// Field names of a validation map are user data and stay verbatim.
    pub fn to_json(&self, naming: NamingPolicy) -> Value {
        match self {
            Self::Plain { message } => {
                let mut obj = Map::new();
                put(&mut obj, naming, "message", Value::String(message.clone()));
                Value::Object(obj)
            }
            Self::WithData { message, data } => {
                let mut obj = Map::new();
                put(&mut obj, naming, "message", Value::String(message.clone()));
                put(&mut obj, naming, "data", data.clone());
                Value::Object(obj)
            }
            Self::Validation(errors) => render_field_errors(errors),
        }
    }
}

/// `{message?, error?}` for outcomes without a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

/// `{data, error?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectEnvelope {
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

/// `{data: [...], error?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsEnvelope {
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

/// `{data: [...], totalItems, pages, error?}`
///
/// `total_items` and `pages` describe the whole dataset, not `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub data: Vec<Value>,
    pub total_items: u64,
    pub pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Message(MessageEnvelope),
    Object(ObjectEnvelope),
    Items(ItemsEnvelope),
    Page(PageEnvelope),
    /// A successful object payload emitted without `{data}`.
    Bare(Value),
}

impl Envelope {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Object(_) => "object",
            Self::Items(_) => "items",
            Self::Page(_) => "page",
            Self::Bare(_) => "bare",
        }
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Message(env) => env.error.as_ref(),
            Self::Object(env) => env.error.as_ref(),
            Self::Items(env) => env.error.as_ref(),
            Self::Page(env) => env.error.as_ref(),
            Self::Bare(_) => None,
        }
    }

    /// JSON body with envelope keys renamed by `naming`. Payload contents are never renamed.
    pub fn to_json(&self, naming: NamingPolicy) -> Value {
        let mut obj = Map::new();
        let error = self.error();
        match self {
            Self::Bare(data) => return data.clone(),
            Self::Message(env) => {
                if let Some(message) = &env.message {
                    put(&mut obj, naming, "message", Value::String(message.clone()));
                }
            }
            Self::Object(env) => put(&mut obj, naming, "data", env.data.clone()),
            Self::Items(env) => put(&mut obj, naming, "data", Value::Array(env.data.clone())),
            Self::Page(env) => {
                put(&mut obj, naming, "data", Value::Array(env.data.clone()));
                put(&mut obj, naming, "totalItems", Value::from(env.total_items));
                put(&mut obj, naming, "pages", Value::from(env.pages));
            }
        }
        if let Some(error) = error {
            put(&mut obj, naming, "error", error.to_json(naming));
        }
        Value::Object(obj)
    }
}

fn put(obj: &mut Map<String, Value>, naming: NamingPolicy, key: &str, value: Value) {
    obj.insert(naming.convert(key), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_payload_matches_render() {
        let errors = [
            ResultError::plain("boom"),
            ResultError::with_data(json!({"id": 3}), None),
            ResultError::field("email", Some(["required", "invalid"])),
        ];
        for error in &errors {
            let payload = ErrorPayload::from(error);
            assert_eq!(payload.to_json(NamingPolicy::CamelCase), error.render());
            assert_eq!(serde_json::to_value(&payload).unwrap(), error.render());
        }
    }

    #[test]
    fn serialize_matches_camel_case_to_json() {
        let env = Envelope::Page(PageEnvelope {
            data: vec![json!(1), json!(2)],
            total_items: 47,
            pages: 5,
            error: None,
        });
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            env.to_json(NamingPolicy::CamelCase)
        );
    }

    #[test]
    fn naming_applies_to_envelope_and_error_keys() {
        let env = Envelope::Page(PageEnvelope {
            data: vec![json!({"firstName": "Ada"})],
            total_items: 1,
            pages: 1,
            error: Some(ErrorPayload::Plain {
                message: "partial".to_string(),
            }),
        });
        assert_eq!(
            env.to_json(NamingPolicy::PascalCase),
            json!({
                "Data": [{"firstName": "Ada"}],
                "TotalItems": 1,
                "Pages": 1,
                "Error": {"Message": "partial"}
            })
        );
    }

    #[test]
    fn validation_field_names_stay_verbatim() {
        let mut errors = FieldErrors::new();
        errors.insert("first_name".to_string(), vec!["required".to_string()]);
        let env = Envelope::Message(MessageEnvelope {
            message: None,
            error: Some(ErrorPayload::Validation(errors)),
        });
        assert_eq!(
            env.to_json(NamingPolicy::PascalCase),
            json!({"Error": {"first_name": ["required"]}})
        );
    }

    #[test]
    fn validation_payload_matches_error_render() {
        let error = ResultError::field("Email", Some(["Email is required", "Email is invalid"]));
        let payload = ErrorPayload::from(&error);
        for naming in [NamingPolicy::CamelCase, NamingPolicy::SnakeCase, NamingPolicy::AsIs] {
            assert_eq!(payload.to_json(naming), error.render());
        }
    }

    #[test]
    fn empty_message_envelope_is_empty_object() {
        let env = Envelope::Message(MessageEnvelope {
            message: None,
            error: None,
        });
        assert_eq!(env.to_json(NamingPolicy::CamelCase), json!({}));
        assert_eq!(env.kind(), "message");
    }
}
