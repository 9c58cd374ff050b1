//! Client error types

use lab_booking_core::ServiceError;
use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required; the session has been logged out
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unexpected status code
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Map a non-success status and its body to an error.
    ///
    /// The message is the body's `message` or `detail` field, else the
    /// status reason.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown API error")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

impl From<ClientError> for ServiceError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http(e) => ServiceError::Transport(e.to_string()),
            ClientError::Unauthorized => ServiceError::Unauthorized,
            ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::Validation(msg)
            | ClientError::Server { message: msg, .. } => ServiceError::Rejected(msg),
            ClientError::InvalidResponse(msg) => ServiceError::InvalidResponse(msg),
            ClientError::Serialization(e) => ServiceError::InvalidResponse(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized
        ));
        let body = r#"{"detail": "No Booking matches the given query."}"#;
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, body),
            ClientError::NotFound(msg) if msg == "No Booking matches the given query."
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, r#"{"message": "Coupon expired"}"#),
            ClientError::Validation(msg) if msg == "Coupon expired"
        ));
    }

    #[test]
    fn test_falls_back_to_reason_phrase() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(
            err,
            ClientError::Server { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_into_service_error() {
        let rejected: ServiceError =
            ClientError::from_status(StatusCode::BAD_REQUEST, r#"{"message": "Coupon expired"}"#)
                .into();
        assert_eq!(rejected.server_message(), Some("Coupon expired"));

        let unauthorized: ServiceError = ClientError::Unauthorized.into();
        assert_eq!(unauthorized, ServiceError::Unauthorized);
    }
}
