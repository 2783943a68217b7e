// Error type for the GitHub plugin.
//
// Failures are forwarded to the caller; there is no retry policy here. The
// integration layer decides whether a failure becomes a redirect with a
// flash message or a plain error response.

use minni_auth_core::error::{AuthError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum GithubAuthError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to parse GitHub profile response")]
    ProfileParse,

    #[error("No usable email address on the GitHub profile for « {0} »")]
    MissingEmail(String),

    #[error("State mismatch on callback")]
    StateMismatch,

    #[error("GitHub denied the authorization request: {0}")]
    ProviderDenied(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error(transparent)]
    Store(#[from] AuthError),
}

impl GithubAuthError {
    /// Stable code for this error, for logs and error responses.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl(_) => ErrorCode::InvalidCallbackUrl,
            Self::Http(_) | Self::ProfileParse => ErrorCode::FailedToFetchProfile,
            Self::TokenExchange(_) => ErrorCode::FailedToExchangeCode,
            Self::MissingEmail(_) => ErrorCode::MissingEmail,
            Self::StateMismatch => ErrorCode::StateMismatch,
            Self::ProviderDenied(_) => ErrorCode::ProviderDenied,
            Self::AuthenticationRequired => ErrorCode::AuthenticationRequired,
            Self::Store(_) => ErrorCode::InternalServerError,
        }
    }
}

pub type Result<T> = std::result::Result<T, GithubAuthError>;
