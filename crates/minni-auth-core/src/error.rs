// Error taxonomy for the auth plugins.
//
// ErrorCode covers every failure the flows can surface to a user or a log
// line. ApiError pairs a code with an HTTP status for integrations that
// answer over HTTP. AuthError is the internal error type threaded through
// the store and strategy seams.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable error codes surfaced by the auth flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingConfiguration,
    InvalidCallbackUrl,
    UnknownProviderUser,
    ProviderDenied,
    StateMismatch,
    MissingEmail,
    FailedToCreateUser,
    FailedToSaveUser,
    FailedToExchangeCode,
    FailedToFetchProfile,
    AuthenticationRequired,
    InternalServerError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingConfiguration => "Missing configuration",
            Self::InvalidCallbackUrl => "Invalid callback URL",
            Self::UnknownProviderUser => "Unknown provider user",
            Self::ProviderDenied => "Provider denied the request",
            Self::StateMismatch => "State mismatch",
            Self::MissingEmail => "No email address available from provider",
            Self::FailedToCreateUser => "Failed to create user",
            Self::FailedToSaveUser => "Failed to save user",
            Self::FailedToExchangeCode => "Failed to exchange authorization code",
            Self::FailedToFetchProfile => "Failed to fetch provider profile",
            Self::AuthenticationRequired => "Authentication required",
            Self::InternalServerError => "Internal server error",
        };
        write!(f, "{msg}")
    }
}

/// HTTP status codes used by the API error system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpStatus {
    Ok = 200,
    Found = 302,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn status_code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// An error with an HTTP status, a stable code, and a human-readable message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status} {code}: {message}")]
pub struct ApiError {
    pub status: HttpStatus,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: HttpStatus, code: ErrorCode) -> Self {
        Self {
            message: code.to_string(),
            status,
            code,
        }
    }

    pub fn with_message(status: HttpStatus, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: ErrorCode) -> Self {
        Self::new(HttpStatus::BadRequest, code)
    }

    pub fn unauthorized(code: ErrorCode) -> Self {
        Self::new(HttpStatus::Unauthorized, code)
    }

    pub fn internal(code: ErrorCode) -> Self {
        Self::new(HttpStatus::InternalServerError, code)
    }

    /// Build a JSON body for the error response.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.message,
        })
    }
}

/// Internal (non-HTTP) error threaded through the store and strategy seams.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Unified result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_screaming_snake() {
        let json = serde_json::to_value(ErrorCode::UnknownProviderUser).unwrap();
        assert_eq!(json, "UNKNOWN_PROVIDER_USER");
    }

    #[test]
    fn api_error_display_and_json() {
        let err = ApiError::unauthorized(ErrorCode::AuthenticationRequired);
        assert_eq!(err.status.status_code(), 401);
        assert!(err.to_string().contains("Authentication required"));

        let body = err.to_json();
        assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");
    }

    #[test]
    fn auth_error_wraps_api_error() {
        let err: AuthError = ApiError::bad_request(ErrorCode::StateMismatch).into();
        assert!(err.to_string().contains("State mismatch"));
    }
}
