use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized - token may be invalid")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Extract the server's `{"error": "..."}` message when the body carries
    /// one, falling back to the (truncated) raw body.
    fn extract_message(body: &str) -> String {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if !parsed.error.is_empty() => parsed.error,
            _ => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(Self::truncate_body(body)),
            400..=499 => ApiError::BadRequest(Self::extract_message(body)),
            500..=599 => ApiError::ServerError(Self::truncate_body(body)),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, Self::truncate_body(body))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_bad_request_extracts_server_error_field() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "user not found"}"#);
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "user not found"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_request_falls_back_to_raw_body() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "not json");
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "not json"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < body.len());
    }
}
