//! Request / Reply traits - リクエスト型と結果型の対応付け
//!
//! # 学習ポイント
//! - Associated Types (`type Output`)
//! - `Reply` は dispatch が観測できる最小限の面（status / error）だけを公開

use std::any::type_name;

use crate::domain::{
    CollectionOutcome, Outcome, PaginatedOutcome, ResultError, StatusCode, TypedOutcome,
};

/// A request routed by its concrete type to exactly one handler.
///
/// # 使用例
/// ```ignore
/// struct GetUser { id: u32 }
///
/// impl Request for GetUser {
///     type Output = TypedOutcome<User>;
/// }
/// ```
pub trait Request: Send + 'static {
    type Output: Reply;
}

/// A value a handler can return through the dispatcher.
///
/// Only status and error are inspected (for tracing); the value itself is
/// returned to the caller untouched.
pub trait Reply: Send + 'static {
    fn status(&self) -> StatusCode;

    fn error(&self) -> Option<&ResultError>;

    fn is_success(&self) -> bool {
        self.error().is_none()
    }
}

impl Reply for Outcome {
    fn status(&self) -> StatusCode {
        Outcome::status(self)
    }

    fn error(&self) -> Option<&ResultError> {
        Outcome::error(self)
    }
}

impl<T: Send + 'static> Reply for TypedOutcome<T> {
    fn status(&self) -> StatusCode {
        TypedOutcome::status(self)
    }

    fn error(&self) -> Option<&ResultError> {
        TypedOutcome::error(self)
    }
}

impl<T: Send + 'static> Reply for CollectionOutcome<T> {
    fn status(&self) -> StatusCode {
        CollectionOutcome::status(self)
    }

    fn error(&self) -> Option<&ResultError> {
        CollectionOutcome::error(self)
    }
}

impl<T: Send + 'static> Reply for PaginatedOutcome<T> {
    fn status(&self) -> StatusCode {
        PaginatedOutcome::status(self)
    }

    fn error(&self) -> Option<&ResultError> {
        PaginatedOutcome::error(self)
    }
}

/// Type name without its module path, generics kept (`a::b::Page<c::X>` → `Page<c::X>`).
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map(|i| i + 2).unwrap_or(0);
    &full[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Failure;

    struct GetUser;

    #[test]
    fn short_name_strips_module_path() {
        assert_eq!(short_type_name::<GetUser>(), "GetUser");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn short_name_keeps_generic_arguments() {
        let name = short_type_name::<TypedOutcome<GetUser>>();
        assert!(name.starts_with("TypedOutcome<"));
        assert!(name.ends_with("GetUser>"));
    }

    #[test]
    fn reply_exposes_status_and_error() {
        let o: TypedOutcome<u32> = Failure::conflict("taken").into();
        assert_eq!(Reply::status(&o), StatusCode::CONFLICT);
        assert!(!Reply::is_success(&o));
        assert!(Reply::is_success(&Outcome::ok()));
    }
}
