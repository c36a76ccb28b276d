//! CastError - 型付き Outcome と非型付き Outcome の変換失敗
//!
//! narrowing (untyped → typed) は payload の実際の形や型が期待と違えば失敗します。
//! 黙って切り捨てたり変換したりはしません。

/// Failure while converting between untyped and typed outcomes.
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    /// The payload variant does not match the requested outcome shape.
    #[error("cannot narrow a {found} payload into {expected}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The payload has the right shape but its contents are not a `target`.
    #[error("payload is not a valid {target}: {source}")]
    Decode {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A typed payload could not be turned into an opaque value.
    #[error("payload of type {source_type} could not be encoded: {source}")]
    Encode {
        source_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// Outcome → Outcome never fails; lets untyped outcomes go through the same
// fallible widening path as typed ones.
impl From<std::convert::Infallible> for CastError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
