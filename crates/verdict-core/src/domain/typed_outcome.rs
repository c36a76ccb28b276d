//! Typed outcomes and the explicit conversions to and from [`Outcome`].
//!
//! # 変換ルール
//! - typed → untyped: payload を `serde_json::Value` にエンコード（失敗し得る）
//! - untyped → typed: payload の形と型を検査してデコード（失敗し得る）
//!
//! 暗黙の変換はありません。どちらも `TryFrom` で明示的に行います。

use std::any::type_name;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::cast::CastError;
use super::errors::ResultError;
use super::failure::Failure;
use super::outcome::{Outcome, Page, Payload};
use super::status::StatusCode;

/// Status, message and error shared by every typed outcome.
#[derive(Debug, Clone, PartialEq)]
struct Head {
    status: StatusCode,
    message: Option<String>,
    error: Option<ResultError>,
}

impl Head {
    fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            error: None,
        }
    }

    fn from_failure(failure: Failure) -> Self {
        let (status, error) = failure.into_parts();
        let message = Some(error.message().to_string()).filter(|m| !m.is_empty());
        Self {
            status,
            message,
            error: Some(error),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, CastError> {
    serde_json::to_value(value).map_err(|source| CastError::Encode {
        source_type: type_name::<T>(),
        source,
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CastError> {
    serde_json::from_value(value).map_err(|source| CastError::Decode {
        target: type_name::<T>(),
        source,
    })
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, CastError> {
    items.into_iter().map(decode).collect()
}

fn encode_items<T: Serialize>(items: &[T]) -> Result<Vec<Value>, CastError> {
    items.iter().map(encode).collect()
}

/// Outcome with a statically known payload type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedOutcome<T> {
    head: Head,
    data: Option<T>,
}

impl<T> TypedOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            head: Head::ok(),
            data: Some(data),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            head: Head {
                status: StatusCode::CREATED,
                ..Head::ok()
            },
            data: Some(data),
        }
    }

    /// Success without data.
    pub fn empty() -> Self {
        Self {
            head: Head::ok(),
            data: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.head.message = Some(message.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    pub fn message(&self) -> Option<&str> {
        self.head.message.as_deref()
    }

    pub fn error(&self) -> Option<&ResultError> {
        self.head.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.head.error.is_none()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> From<Failure> for TypedOutcome<T> {
    fn from(failure: Failure) -> Self {
        Self {
            head: Head::from_failure(failure),
            data: None,
        }
    }
}

impl<T: Serialize> TryFrom<TypedOutcome<T>> for Outcome {
    type Error = CastError;

    fn try_from(typed: TypedOutcome<T>) -> Result<Self, Self::Error> {
        let payload = match typed.data.as_ref().map(encode).transpose()? {
            None | Some(Value::Null) => None,
            Some(v) => Some(Payload::Object(v)),
        };
        let Head {
            status,
            message,
            error,
        } = typed.head;
        Ok(Outcome::from_parts(status, payload, message, error))
    }
}

impl<T: DeserializeOwned> TryFrom<Outcome> for TypedOutcome<T> {
    type Error = CastError;

    fn try_from(outcome: Outcome) -> Result<Self, Self::Error> {
        let (status, payload, message, error) = outcome.into_parts();
        let data = match payload {
            None => None,
            Some(Payload::Object(v)) => Some(decode(v)?),
            Some(Payload::Collection(items)) => Some(decode(Value::Array(items))?),
            Some(other @ Payload::Paginated(_)) => {
                return Err(CastError::ShapeMismatch {
                    expected: "object",
                    found: other.shape_name(),
                });
            }
        };
        Ok(Self {
            head: Head {
                status,
                message,
                error,
            },
            data,
        })
    }
}

/// Outcome whose payload is a collection of items.
///
/// A failure carries no collection at all; it projects like any other
/// payload-less failure (`{message, error}`), not as an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOutcome<T> {
    head: Head,
    items: Option<Vec<T>>,
}

impl<T> CollectionOutcome<T> {
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            head: Head::ok(),
            items: Some(items),
        }
    }

    /// A missing collection becomes an empty one.
    pub fn from_option(items: Option<Vec<T>>) -> Self {
        Self::ok(items.unwrap_or_default())
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.head.message = Some(message.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    pub fn message(&self) -> Option<&str> {
        self.head.message.as_deref()
    }

    pub fn error(&self) -> Option<&ResultError> {
        self.head.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.head.error.is_none()
    }

    pub fn items(&self) -> &[T] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items.unwrap_or_default()
    }
}

impl<T> From<Vec<T>> for CollectionOutcome<T> {
    fn from(items: Vec<T>) -> Self {
        Self::ok(items)
    }
}

impl<T> From<Failure> for CollectionOutcome<T> {
    fn from(failure: Failure) -> Self {
        Self {
            head: Head::from_failure(failure),
            items: None,
        }
    }
}

impl<T: Serialize> TryFrom<CollectionOutcome<T>> for Outcome {
    type Error = CastError;

    fn try_from(typed: CollectionOutcome<T>) -> Result<Self, Self::Error> {
        let payload = match &typed.items {
            Some(items) => Some(Payload::Collection(encode_items(items)?)),
            None => None,
        };
        let Head {
            status,
            message,
            error,
        } = typed.head;
        Ok(Outcome::from_parts(status, payload, message, error))
    }
}

impl<T: DeserializeOwned> TryFrom<Outcome> for CollectionOutcome<T> {
    type Error = CastError;

    fn try_from(outcome: Outcome) -> Result<Self, Self::Error> {
        let (status, payload, message, error) = outcome.into_parts();
        let items = match payload {
            None => None,
            Some(Payload::Collection(items)) => Some(decode_items(items)?),
            Some(Payload::Object(Value::Array(items))) => Some(decode_items(items)?),
            Some(other) => {
                return Err(CastError::ShapeMismatch {
                    expected: "collection",
                    found: other.shape_name(),
                });
            }
        };
        Ok(Self {
            head: Head {
                status,
                message,
                error,
            },
            items,
        })
    }
}

/// Collection outcome for one page of a larger dataset.
///
/// A failure has no page, so no totals are reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedOutcome<T> {
    head: Head,
    page: Option<Page<T>>,
}

impl<T> PaginatedOutcome<T> {
    pub fn ok(items: Vec<T>, total_count: u64, page_count: u64) -> Self {
        Self {
            head: Head::ok(),
            page: Some(Page::new(items, total_count, page_count)),
        }
    }

    pub fn from_page(page: Page<T>) -> Self {
        Self {
            head: Head::ok(),
            page: Some(page),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.head.message = Some(message.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    pub fn message(&self) -> Option<&str> {
        self.head.message.as_deref()
    }

    pub fn error(&self) -> Option<&ResultError> {
        self.head.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.head.error.is_none()
    }

    pub fn items(&self) -> &[T] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or_default()
    }

    pub fn total_count(&self) -> u64 {
        self.page.as_ref().map_or(0, |p| p.total_count)
    }

    pub fn page_count(&self) -> u64 {
        self.page.as_ref().map_or(0, |p| p.page_count)
    }

    /// The page, absent when this outcome is a failure without one.
    pub fn page(&self) -> Option<&Page<T>> {
        self.page.as_ref()
    }

    pub fn into_page(self) -> Option<Page<T>> {
        self.page
    }
}

impl<T> From<Failure> for PaginatedOutcome<T> {
    fn from(failure: Failure) -> Self {
        Self {
            head: Head::from_failure(failure),
            page: None,
        }
    }
}

impl<T: Serialize> TryFrom<PaginatedOutcome<T>> for Outcome {
    type Error = CastError;

    fn try_from(typed: PaginatedOutcome<T>) -> Result<Self, Self::Error> {
        let payload = match &typed.page {
            Some(page) => Some(Payload::Paginated(Page::new(
                encode_items(&page.items)?,
                page.total_count,
                page.page_count,
            ))),
            None => None,
        };
        let Head {
            status,
            message,
            error,
        } = typed.head;
        Ok(Outcome::from_parts(status, payload, message, error))
    }
}

impl<T: DeserializeOwned> TryFrom<Outcome> for PaginatedOutcome<T> {
    type Error = CastError;

    fn try_from(outcome: Outcome) -> Result<Self, Self::Error> {
        let (status, payload, message, error) = outcome.into_parts();
        let page = match payload {
            None => None,
            Some(Payload::Paginated(page)) => Some(Page::new(
                decode_items(page.items)?,
                page.total_count,
                page.page_count,
            )),
            Some(other) => {
                return Err(CastError::ShapeMismatch {
                    expected: "paginated",
                    found: other.shape_name(),
                });
            }
        };
        Ok(Self {
            head: Head {
                status,
                message,
                error,
            },
            page,
        })
    }
}

impl Outcome {
    /// Narrow to a typed outcome; fails if the payload is not a `T`.
    pub fn narrow<T: DeserializeOwned>(self) -> Result<TypedOutcome<T>, CastError> {
        TypedOutcome::try_from(self)
    }

    pub fn narrow_collection<T: DeserializeOwned>(
        self,
    ) -> Result<CollectionOutcome<T>, CastError> {
        CollectionOutcome::try_from(self)
    }

    pub fn narrow_paginated<T: DeserializeOwned>(self) -> Result<PaginatedOutcome<T>, CastError> {
        PaginatedOutcome::try_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: u32,
        name: String,
    }

    fn alice() -> User {
        User {
            id: 1,
            name: "alice".to_string(),
        }
    }

    #[test]
    fn typed_widens_into_object_payload() {
        let outcome = Outcome::try_from(TypedOutcome::ok(alice())).unwrap();
        assert_eq!(outcome.status(), StatusCode::OK);
        assert_eq!(
            outcome.payload(),
            Some(&Payload::Object(json!({ "id": 1, "name": "alice" })))
        );
    }

    #[test]
    fn narrow_recovers_typed_payload() {
        let typed: TypedOutcome<User> = Outcome::success(json!({ "id": 1, "name": "alice" }))
            .with_message("found")
            .narrow()
            .unwrap();
        assert_eq!(typed.data(), Some(&alice()));
        assert_eq!(typed.message(), Some("found"));
    }

    #[test]
    fn narrow_with_wrong_type_is_a_cast_error() {
        let err = Outcome::success(json!("not a user"))
            .narrow::<User>()
            .unwrap_err();
        assert!(matches!(err, CastError::Decode { .. }));
        assert!(err.to_string().contains("User"));
    }

    #[test]
    fn narrow_keeps_error_and_status() {
        let typed: TypedOutcome<User> = Outcome::failure(Failure::not_found("missing"))
            .narrow()
            .unwrap();
        assert!(typed.data().is_none());
        assert_eq!(typed.status(), StatusCode::NOT_FOUND);
        assert_eq!(typed.error(), Some(&ResultError::plain("missing")));
    }

    #[test]
    fn narrowing_a_page_into_an_object_is_refused() {
        let err = Outcome::paginated(vec![json!(1)], 1, 1)
            .narrow::<Vec<u32>>()
            .unwrap_err();
        assert!(matches!(
            err,
            CastError::ShapeMismatch {
                expected: "object",
                found: "paginated"
            }
        ));
    }

    #[test]
    fn collection_roundtrip_through_untyped() {
        let outcome = Outcome::try_from(CollectionOutcome::ok(vec![alice()])).unwrap();
        assert!(matches!(outcome.payload(), Some(Payload::Collection(items)) if items.len() == 1));
        let back: CollectionOutcome<User> = outcome.narrow_collection().unwrap();
        assert_eq!(back.items(), &[alice()]);
    }

    #[test]
    fn missing_collection_narrows_to_empty() {
        let back: CollectionOutcome<User> = Outcome::ok().narrow_collection().unwrap();
        assert!(back.items().is_empty());
        assert!(CollectionOutcome::<User>::from_option(None).items().is_empty());
    }

    #[test]
    fn collection_rejects_object_payload() {
        let err = Outcome::success(json!({ "id": 1 }))
            .narrow_collection::<User>()
            .unwrap_err();
        assert!(matches!(err, CastError::ShapeMismatch { expected: "collection", .. }));
    }

    #[test]
    fn collection_item_with_wrong_type_fails_loudly() {
        let err = Outcome::collection(vec![json!({ "id": 1, "name": "a" }), json!(3)])
            .narrow_collection::<User>()
            .unwrap_err();
        assert!(matches!(err, CastError::Decode { .. }));
    }

    #[test]
    fn paginated_keeps_totals_through_conversion() {
        let typed = PaginatedOutcome::ok(vec![alice()], 47, 5);
        let outcome = Outcome::try_from(typed).unwrap();
        let back: PaginatedOutcome<User> = outcome.narrow_paginated().unwrap();
        assert_eq!(back.total_count(), 47);
        assert_eq!(back.page_count(), 5);
        assert_eq!(back.items().len(), 1);
    }

    #[test]
    fn failure_converts_into_every_typed_outcome() {
        let typed: TypedOutcome<User> = Failure::forbidden("no").into();
        let coll: CollectionOutcome<User> = Failure::conflict("dup").into();
        let page: PaginatedOutcome<User> = Failure::unauthorized("who").into();

        assert_eq!(typed.status(), StatusCode::FORBIDDEN);
        assert_eq!(coll.status(), StatusCode::CONFLICT);
        assert!(coll.items().is_empty());
        assert_eq!(page.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(page.total_count(), 0);
        assert!(page.page().is_none());
    }

    #[test]
    fn failed_list_outcomes_widen_without_payload() {
        let page: PaginatedOutcome<User> =
            Failure::business_rule_violated("user is locked").into();
        let coll: CollectionOutcome<User> = Failure::not_found("no users").into();

        let page = Outcome::try_from(page).unwrap();
        assert!(page.payload().is_none());
        assert_eq!(page.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(page.message(), Some("user is locked"));

        let coll = Outcome::try_from(coll).unwrap();
        assert!(coll.payload().is_none());
        assert_eq!(coll.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn empty_page_success_still_carries_totals() {
        let outcome = Outcome::try_from(PaginatedOutcome::<User>::ok(Vec::new(), 0, 0)).unwrap();
        assert!(matches!(
            outcome.payload(),
            Some(Payload::Paginated(page)) if page.items.is_empty() && page.total_count == 0
        ));
    }

    #[test]
    fn unserializable_payload_is_an_encode_error() {
        let mut grid = HashMap::new();
        grid.insert((1_u8, 2_u8), 3_u8);

        let err = Outcome::try_from(TypedOutcome::ok(grid)).unwrap_err();
        assert!(matches!(err, CastError::Encode { .. }));
        assert!(err.to_string().contains("HashMap"));
    }
}
