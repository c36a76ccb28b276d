//! Domain model: result errors, outcomes and their typed views.
//!
//! - errors: ResultError（Plain / WithData / Validation）と render 契約
//! - failure: 固定ステータスの Failure ファクトリ
//! - outcome: 非型付き Outcome と Payload（Object / Collection / Paginated）
//! - typed_outcome: TypedOutcome / CollectionOutcome / PaginatedOutcome
//! - cast: narrowing 失敗 (CastError)
//! - status: HTTP ステータスの補助関数

pub mod cast;
pub mod errors;
pub mod failure;
pub mod outcome;
pub mod status;
pub mod typed_outcome;

pub use cast::CastError;
pub use errors::{FieldErrors, ResultError};
pub use failure::{Failure, FailureKind};
pub use outcome::{Outcome, Page, Payload};
pub use status::{StatusCode, reason_phrase};
pub use typed_outcome::{CollectionOutcome, PaginatedOutcome, TypedOutcome};
