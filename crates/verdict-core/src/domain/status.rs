//! HTTP status helpers shared by outcomes and responses.

pub use http::StatusCode;

/// Reason phrase used when a code has no registered name.
pub const UNKNOWN_REASON: &str = "Unknown";

/// Human-readable reason phrase for a status code.
///
/// Uses the RFC 9110 names; codes outside the registry yield [`UNKNOWN_REASON`].
pub fn reason_phrase(code: u16) -> &'static str {
    // RFC 9110 renamed 413/414/422; `http` still reports the RFC 7231 names.
    match code {
        413 => return "Content Too Large",
        414 => return "URI Too Long",
        422 => return "Unprocessable Content",
        _ => {}
    }
    StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or(UNKNOWN_REASON)
}

/// True for 4xx and 5xx codes.
pub fn is_error_class(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, "Continue")]
    #[case(101, "Switching Protocols")]
    #[case(200, "OK")]
    #[case(201, "Created")]
    #[case(204, "No Content")]
    #[case(301, "Moved Permanently")]
    #[case(302, "Found")]
    #[case(400, "Bad Request")]
    #[case(401, "Unauthorized")]
    #[case(403, "Forbidden")]
    #[case(404, "Not Found")]
    #[case(422, "Unprocessable Content")]
    #[case(500, "Internal Server Error")]
    #[case(502, "Bad Gateway")]
    #[case(503, "Service Unavailable")]
    fn known_codes_have_reason_phrases(#[case] code: u16, #[case] expected: &str) {
        assert_eq!(reason_phrase(code), expected);
    }

    #[rstest]
    #[case::out_of_range(999)]
    #[case::unregistered(299)]
    #[case::invalid(42)]
    fn unknown_codes_fall_back(#[case] code: u16) {
        assert_eq!(reason_phrase(code), UNKNOWN_REASON);
    }

    #[test]
    fn error_class_covers_4xx_and_5xx() {
        assert!(is_error_class(StatusCode::NOT_FOUND));
        assert!(is_error_class(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_error_class(StatusCode::OK));
        assert!(!is_error_class(StatusCode::FOUND));
    }
}
