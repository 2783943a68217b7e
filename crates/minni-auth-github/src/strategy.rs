// GithubStrategy: the seam in front of the OAuth handshake.
//
// The handshake itself (authorization URL, CSRF state, code exchange) is
// delegated to the external `oauth2` crate; this module only configures it
// with GitHub's endpoints and the plugin options, and fetches the profile
// from the GitHub API afterwards. Tests substitute the trait with a stub.

use std::fmt;

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use reqwest::{redirect, ClientBuilder};

use minni_auth_core::options::GithubAuthOptions;

use crate::error::GithubAuthError;
use crate::profile::{pick_email, GithubEmail, GithubProfile};

pub const AUTHORIZATION_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
pub const TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
pub const USER_ENDPOINT: &str = "https://api.github.com/user";
pub const EMAILS_ENDPOINT: &str = "https://api.github.com/user/emails";

/// An outgoing authorization request: where to send the browser, and the
/// CSRF state to record for the callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// The strategy every GitHub flow drives: build the redirect, exchange the
/// code, fetch the profile.
#[async_trait]
pub trait GithubStrategy: Send + Sync + fmt::Debug {
    /// Build the provider authorization URL with a fresh CSRF state.
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Exchange an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, GithubAuthError>;

    /// Fetch the user's GitHub profile with an access token.
    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, GithubAuthError>;
}

/// Production strategy backed by the `oauth2` crate and `reqwest`.
#[derive(Debug)]
pub struct OAuth2GithubStrategy {
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
    scope: Vec<String>,
    user_agent: String,
}

impl OAuth2GithubStrategy {
    /// Configure the strategy from plugin options.
    pub fn from_options(options: &GithubAuthOptions) -> Result<Self, GithubAuthError> {
        Ok(Self {
            client_id: ClientId::new(options.id.clone()),
            client_secret: ClientSecret::new(options.secret.clone()),
            auth_url: AuthUrl::new(AUTHORIZATION_ENDPOINT.to_string())?,
            token_url: TokenUrl::new(TOKEN_ENDPOINT.to_string())?,
            redirect_url: RedirectUrl::new(options.callback.clone())?,
            scope: options.scope.clone(),
            user_agent: options.user_agent.clone(),
        })
    }

    fn api_client(&self) -> Result<reqwest::Client, GithubAuthError> {
        Ok(ClientBuilder::new()
            .user_agent(self.user_agent.clone())
            .build()?)
    }

    /// Best-effort lookup of the account's primary verified email.
    ///
    /// GitHub leaves the public `email` field null for most accounts; with
    /// the `user:email` scope the `/user/emails` listing fills the gap. A
    /// missing or unreadable listing is not an error here: only signup
    /// actually requires an email, and the verify step reports that case.
    async fn fetch_primary_email(&self, access_token: &str) -> Option<String> {
        let client = self.api_client().ok()?;
        let emails: Vec<GithubEmail> = client
            .get(EMAILS_ENDPOINT)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?
            .json()
            .await
            .ok()?;
        pick_email(&emails)
    }
}

#[async_trait]
impl GithubStrategy for OAuth2GithubStrategy {
    fn authorization_request(&self) -> AuthorizationRequest {
        let (auth_url, csrf_token) = BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone())
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scope.iter().map(|s| Scope::new(s.clone())))
            .url();

        AuthorizationRequest {
            url: auth_url.to_string(),
            state: csrf_token.secret().clone(),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, GithubAuthError> {
        let http_client = ClientBuilder::new()
            .redirect(redirect::Policy::none())
            .build()?;

        let token_result = BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone())
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&http_client)
            .await
            .map_err(|e| {
                let message = match &e {
                    oauth2::RequestTokenError::ServerResponse(err) => {
                        format!("server response: {:?}", err.error_description())
                    }
                    oauth2::RequestTokenError::Parse(_, body) => match std::str::from_utf8(body) {
                        Ok(body) => format!("unparseable response: {body}"),
                        Err(_) => "unparseable non-UTF8 response".to_string(),
                    },
                    _ => format!("{e:?}"),
                };
                GithubAuthError::TokenExchange(message)
            })?;

        Ok(token_result.access_token().secret().to_string())
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, GithubAuthError> {
        let client = self.api_client()?;

        let mut profile: GithubProfile = client
            .get(USER_ENDPOINT)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|_| GithubAuthError::ProfileParse)?;

        if profile.email.is_none() {
            profile.email = self.fetch_primary_email(access_token).await;
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> OAuth2GithubStrategy {
        let options = GithubAuthOptions::new(
            "client-id",
            "client-secret",
            "https://minni.im/auth/github/callback",
        );
        OAuth2GithubStrategy::from_options(&options).unwrap()
    }

    #[test]
    fn authorization_request_targets_github_with_scope_and_state() {
        let request = strategy().authorization_request();

        assert!(request.url.starts_with(AUTHORIZATION_ENDPOINT));
        assert!(request.url.contains("client_id=client-id"));
        assert!(request.url.contains("scope=user%3Aemail"));
        assert!(request
            .url
            .contains("redirect_uri=https%3A%2F%2Fminni.im%2Fauth%2Fgithub%2Fcallback"));
        assert!(!request.state.is_empty());
        assert!(request.url.contains(&format!("state={}", request.state)));
    }

    #[test]
    fn each_authorization_request_gets_a_fresh_state() {
        let s = strategy();
        let first = s.authorization_request();
        let second = s.authorization_request();
        assert_ne!(first.state, second.state);
    }

    #[test]
    fn from_options_rejects_bad_callback() {
        let options = GithubAuthOptions::new("id", "secret", "not a url");
        assert!(OAuth2GithubStrategy::from_options(&options).is_err());
    }
}
