// GithubAuthOptions: configuration for the GitHub sign-in plugin.
//
// Mirrors the options object the host application passes when registering
// the plugin: OAuth application credentials, callback URL, requested scopes,
// and the redirect targets used after the provider hands control back.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

fn default_user_agent() -> String {
    "minni.im".to_string()
}

fn default_success_redirect() -> String {
    "/".to_string()
}

fn default_failure_redirect() -> String {
    "/login".to_string()
}

fn default_failure_flash() -> bool {
    true
}

fn default_scope() -> Vec<String> {
    vec!["user:email".to_string()]
}

/// Configuration for the GitHub sign-in plugin.
///
/// `id`, `secret` and `callback` come from the GitHub OAuth application the
/// host registered; everything else has a sensible default.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubAuthOptions {
    /// OAuth client id.
    pub id: String,

    /// OAuth client secret.
    pub secret: String,

    /// Absolute callback URL registered with GitHub.
    pub callback: String,

    /// User-Agent sent on outbound requests to the GitHub API.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Requested OAuth scopes.
    #[serde(default = "default_scope")]
    pub scope: Vec<String>,

    /// Where to send the user after a successful sign-in.
    #[serde(default = "default_success_redirect")]
    pub success_redirect: String,

    /// Where to send the user after a failed sign-in.
    #[serde(default = "default_failure_redirect")]
    pub failure_redirect: String,

    /// Whether failures set a flash message for the host to render.
    #[serde(default = "default_failure_flash")]
    pub failure_flash: bool,

    /// Base64-encoded logo for login buttons. Filled with the bundled
    /// GitHub mark by the plugin when left unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

// Manual Debug impl so the client secret never lands in logs.
impl std::fmt::Debug for GithubAuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubAuthOptions")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .field("callback", &self.callback)
            .field("user_agent", &self.user_agent)
            .field("scope", &self.scope)
            .field("success_redirect", &self.success_redirect)
            .field("failure_redirect", &self.failure_redirect)
            .field("failure_flash", &self.failure_flash)
            .finish()
    }
}

impl GithubAuthOptions {
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        callback: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            callback: callback.into(),
            user_agent: default_user_agent(),
            scope: default_scope(),
            success_redirect: default_success_redirect(),
            failure_redirect: default_failure_redirect(),
            failure_flash: default_failure_flash(),
            logo: None,
        }
    }

    pub fn with_scope(mut self, scopes: &[&str]) -> Self {
        self.scope = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_success_redirect(mut self, url: impl Into<String>) -> Self {
        self.success_redirect = url.into();
        self
    }

    pub fn with_failure_redirect(mut self, url: impl Into<String>) -> Self {
        self.failure_redirect = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the options are usable.
    ///
    /// The id, secret and callback settings are all required, and the
    /// callback must be an absolute URL.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.id.trim().is_empty() || self.secret.trim().is_empty() || self.callback.trim().is_empty() {
            return Err(AuthError::Config(
                "Missing configuration: check your id, secret and callback settings".into(),
            ));
        }

        url::Url::parse(&self.callback)
            .map_err(|_| AuthError::Config(format!("Invalid callback URL: {}", self.callback)))?;

        Ok(())
    }
}
