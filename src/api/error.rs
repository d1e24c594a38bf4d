use thiserror::Error;

/// Errors surfaced by the roster and analytics endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited by server")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad payload from {endpoint}: {detail}")]
    BadPayload { endpoint: String, detail: String },
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut point backs off to a char boundary so multibyte bodies
    /// truncate cleanly.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// Build the error for a parse failure on one endpoint's payload
    pub(crate) fn bad_payload(endpoint: &str, detail: impl ToString) -> Self {
        ApiError::BadPayload {
            endpoint: endpoint.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            code => ApiError::UnexpectedStatus(code, truncated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_codes() {
        let status = |code: u16| reqwest::StatusCode::from_u16(code).unwrap();
        assert!(matches!(
            ApiError::from_status(status(401), ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(status(404), "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(status(429), ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(status(503), "down"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(status(418), ""),
            ApiError::UnexpectedStatus(418, _)
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let status = reqwest::StatusCode::from_u16(500).unwrap();
        let body = "x".repeat(2000);
        let err = ApiError::from_status(status, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < 700);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 3-byte chars put byte 500 mid-character
        let body = "日".repeat(400);
        let status = reqwest::StatusCode::from_u16(500).unwrap();
        let err = ApiError::from_status(status, &body);
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_bad_payload_names_the_endpoint() {
        let err = ApiError::bad_payload("/api/students", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Bad payload from /api/students: expected value at line 1"
        );
    }
}
