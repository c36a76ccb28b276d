//! Errors - 結果に載せるエラー型
//!
//! ハンドラが返す Outcome に同梱されるエラーの閉じた族を定義します。
//! これは制御フローではなく「データ」です（dispatch の失敗とは別物）。
//!
//! # Render contract
//! - `Plain`      → `{"message": ..}`
//! - `WithData`   → `{"message": .., "data": ..}`
//! - `Validation` → `{"field": ["msg", ..], ..}` (no wrapping keys)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default message for [`ResultError::WithData`] when none is given.
pub const DEFAULT_DATA_ERROR_MESSAGE: &str = "An error occurred";

/// Message used when a single-field validation error is built.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Field name → ordered list of validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// An error reported by handler logic as part of an outcome.
///
/// `message` is never absent: a missing message is stored as `""` so that
/// projection stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultError {
    Plain {
        message: String,
    },
    WithData {
        message: String,
        data: Value,
    },
    Validation {
        message: String,
        errors: FieldErrors,
    },
}

impl ResultError {
    pub fn plain(message: impl Into<String>) -> Self {
        Self::Plain {
            message: message.into(),
        }
    }

    /// Error carrying structured data.
    ///
    /// Without a message the default [`DEFAULT_DATA_ERROR_MESSAGE`] is used.
    pub fn with_data(data: Value, message: Option<String>) -> Self {
        Self::WithData {
            message: message.unwrap_or_else(|| DEFAULT_DATA_ERROR_MESSAGE.to_string()),
            data,
        }
    }

    /// Validation error from a full field map. The message stays empty unless given.
    pub fn validation(errors: FieldErrors, message: Option<String>) -> Self {
        Self::Validation {
            message: message.unwrap_or_default(),
            errors,
        }
    }

    /// Validation error for a single field.
    ///
    /// `None` messages become an empty list; the field key is still present.
    pub fn field<I, S>(field: impl Into<String>, messages: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages = messages
            .map(|m| m.into_iter().map(Into::into).collect())
            .unwrap_or_default();
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), messages);
        Self::Validation {
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            errors,
        }
    }

    /// Capture a Rust error as a plain error.
    ///
    /// Only the `Display` text is kept. The error value itself and its
    /// `source()` chain are dropped, since a `ResultError` is plain data
    /// (`Clone`, `PartialEq`, serializable). Return the error as a `Fault`
    /// instead when the caller needs to downcast it.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::plain(err.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Plain { message }
            | Self::WithData { message, .. }
            | Self::Validation { message, .. } => message,
        }
    }

    /// Field errors, only for the validation variant.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Projection-ready payload for this error.
    pub fn render(&self) -> Value {
        match self {
            Self::Plain { message } => {
                let mut obj = Map::new();
                obj.insert("message".to_string(), Value::String(message.clone()));
                Value::Object(obj)
            }
            Self::WithData { message, data } => {
                let mut obj = Map::new();
                obj.insert("message".to_string(), Value::String(message.clone()));
                obj.insert("data".to_string(), data.clone());
                Value::Object(obj)
            }
            Self::Validation { errors, .. } => render_field_errors(errors),
        }
    }
}

/// `{"field": ["msg", ..], ..}` with field names kept verbatim.
pub fn render_field_errors(errors: &FieldErrors) -> Value {
    Value::Object(
        errors
            .iter()
            .map(|(field, messages)| {
                let list = messages.iter().cloned().map(Value::String).collect();
                (field.clone(), Value::Array(list))
            })
            .collect(),
    )
}

impl std::fmt::Display for ResultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { errors, .. } if self.message().is_empty() => {
                write!(f, "validation failed for {} field(s)", errors.len())
            }
            _ => f.write_str(self.message()),
        }
    }
}
