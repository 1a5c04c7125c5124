use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the video backend.
///
/// The display text of every backend variant is the human-readable message
/// shown to the user: the backend's own message when it sent one, otherwise
/// a generic status-based message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required. No token found.")]
    MissingToken,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("{message}")]
    ServerError { status: u16, message: String },

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by the backend. Either field may be present.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Which error-body field wins when both are present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessagePreference {
    Message,
    Error,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull a human-readable message out of an error body.
    ///
    /// A JSON body contributes its `message`/`error` field, or `fallback` when
    /// neither is set. A non-JSON body falls back to the status reason phrase.
    fn extract_message(
        status: StatusCode,
        body: &str,
        preference: MessagePreference,
        fallback: String,
    ) -> String {
        let non_empty = |s: Option<String>| s.filter(|m| !m.trim().is_empty());

        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let message = non_empty(parsed.message);
                let error = non_empty(parsed.error);
                match preference {
                    MessagePreference::Message => message.or(error),
                    MessagePreference::Error => error.or(message),
                }
            }
            Err(_) => status.canonical_reason().map(str::to_string),
        };

        Self::truncate_body(&message.unwrap_or(fallback))
    }

    fn classify(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                message,
            },
            code => ApiError::Backend {
                status: code,
                message,
            },
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let fallback = format!("API Error: {}", status.as_u16());
        let message = Self::extract_message(status, body, MessagePreference::Message, fallback);
        Self::classify(status, message)
    }

    /// Like `from_status`, but the upload endpoint reports failures in `error`
    pub fn from_upload_status(status: StatusCode, body: &str) -> Self {
        let fallback = format!("Upload failed: {}", status.as_u16());
        let message = Self::extract_message(status, body, MessagePreference::Error, fallback);
        Self::classify(status, message)
    }

    /// HTTP status behind this error, when there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Backend { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::MissingToken | ApiError::InvalidResponse(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Missing, invalid or expired credentials
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::MissingToken | ApiError::Unauthorized(_))
    }

    /// Message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkError(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::NetworkError(e) if e.is_connect() => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Notification text for any error raised while talking to the backend.
///
/// Context layers added with `anyhow` are skipped when an `ApiError` sits
/// underneath, so the user sees the backend's message rather than ours.
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.user_message(),
        None => err.to_string(),
    }
}

/// True when the error chain carries a 404 from the backend
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .map(ApiError::is_not_found)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_prefers_backend_message() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"Email already registered"}"#);
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_json_without_message_uses_status_fallback() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, r#"{"code":17}"#);
        assert_eq!(err.to_string(), "API Error: 422");
    }

    #[test]
    fn test_non_json_body_uses_reason_phrase() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "<html>nope</html>");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn test_upload_prefers_error_field() {
        let body = r#"{"error":"Only MP4 files are allowed","message":"Bad Request"}"#;
        let err = ApiError::from_upload_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.to_string(), "Only MP4 files are allowed");

        let err = ApiError::from_upload_status(StatusCode::BAD_REQUEST, "{}");
        assert_eq!(err.to_string(), "Upload failed: 400");
    }

    #[test]
    fn test_status_classification() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "{}").is_auth());
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "{}"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "{}"),
            ApiError::RateLimited
        ));
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "{}");
        assert!(matches!(err, ApiError::ServerError { status: 502, .. }));
        assert_eq!(err.to_string(), "API Error: 502");
        assert!(ApiError::MissingToken.is_auth());
    }

    #[test]
    fn test_long_message_is_truncated() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 50);
        let body = format!(r#"{{"message":"{}"}}"#, long);
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, &body);
        assert!(err.to_string().starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_user_message_sees_through_context() {
        let err = Err::<(), _>(ApiError::NotFound("Video not found".to_string()))
            .context("Failed to fetch video v9")
            .unwrap_err();
        assert_eq!(user_message(&err), "Video not found");
        assert!(is_not_found(&err));

        let plain = anyhow::anyhow!("disk full");
        assert_eq!(user_message(&plain), "disk full");
        assert!(!is_not_found(&plain));
    }
}
