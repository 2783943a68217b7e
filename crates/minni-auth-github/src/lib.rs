#![doc = include_str!("../README.md")]

pub mod error;
pub mod profile;
pub mod state;
pub mod strategy;
pub mod verify;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use minni_auth_core::error::AuthError;
use minni_auth_core::options::GithubAuthOptions;
use minni_auth_core::plugin::{AuthPlugin, FlowKind, PluginEndpoint};

use crate::strategy::OAuth2GithubStrategy;

// Re-exports
pub use error::GithubAuthError;
pub use profile::{GithubEmail, GithubProfile};
pub use state::{AuthAction, FlowState};
pub use strategy::{AuthorizationRequest, GithubStrategy};
pub use verify::{disconnect, verify, VerifyOutcome, PROVIDER_NAME};

/// The GitHub mark bundled for login buttons.
static GITHUB_LOGO: &[u8] = include_bytes!("../assets/github-mark.svg");

/// The "Sign in with GitHub" plugin.
///
/// Holds validated options and hands out the configured strategy plus the
/// routes the host should mount.
#[derive(Debug, Clone)]
pub struct GithubAuth {
    options: GithubAuthOptions,
}

impl GithubAuth {
    /// Build the plugin from options.
    ///
    /// Fails when id, secret or callback are missing or the callback is not
    /// an absolute URL. Fills in the bundled logo when none was supplied.
    pub fn new(mut options: GithubAuthOptions) -> Result<Self, AuthError> {
        options.validate()?;
        if options.logo.is_none() {
            options.logo = Some(STANDARD.encode(GITHUB_LOGO));
        }
        Ok(Self { options })
    }

    /// Build the plugin from `GITHUB_*` environment variables.
    pub fn from_env() -> Result<Self, AuthError> {
        let options = minni_auth_core::env::options_from_env().ok_or_else(|| {
            AuthError::Config(
                "Missing configuration: set GITHUB_CLIENT_ID, GITHUB_CLIENT_SECRET \
                 and GITHUB_CALLBACK_URL"
                    .into(),
            )
        })?;
        Self::new(options)
    }

    pub fn options(&self) -> &GithubAuthOptions {
        &self.options
    }

    /// Configure the OAuth strategy from the plugin options.
    pub fn setup(&self) -> Result<OAuth2GithubStrategy, GithubAuthError> {
        OAuth2GithubStrategy::from_options(&self.options)
    }
}

impl AuthPlugin for GithubAuth {
    fn key(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &str {
        "GitHub"
    }

    fn logo(&self) -> Option<&str> {
        self.options.logo.as_deref()
    }

    fn endpoints(&self) -> Vec<PluginEndpoint> {
        vec![
            PluginEndpoint::get("/login/github", FlowKind::Initialize, false),
            PluginEndpoint::get("/signup/github", FlowKind::Signup, false),
            PluginEndpoint::get("/auth/github/callback", FlowKind::Callback, false),
            PluginEndpoint::get("/connect/github", FlowKind::Connect, true),
            PluginEndpoint::get("/connect/github/revoke", FlowKind::Disconnect, true),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GithubAuthOptions {
        GithubAuthOptions::new("id", "secret", "https://minni.im/auth/github/callback")
    }

    #[test]
    fn new_rejects_missing_configuration() {
        let err = GithubAuth::new(GithubAuthOptions::new("", "", "")).unwrap_err();
        assert!(err.to_string().contains("Missing configuration"));
    }

    #[test]
    fn new_fills_the_bundled_logo() {
        let auth = GithubAuth::new(options()).unwrap();
        let logo = auth.logo().unwrap();
        assert!(!logo.is_empty());
        // Base64 of an SVG starts with the encoding of "<svg".
        assert!(logo.starts_with("PHN2Zy"));
    }

    #[test]
    fn new_keeps_a_custom_logo() {
        let mut opts = options();
        opts.logo = Some("Y3VzdG9t".into());
        let auth = GithubAuth::new(opts).unwrap();
        assert_eq!(auth.logo(), Some("Y3VzdG9t"));
    }

    #[test]
    fn plugin_metadata() {
        let auth = GithubAuth::new(options()).unwrap();
        assert_eq!(auth.key(), "github");
        assert_eq!(auth.display_name(), "GitHub");

        let endpoints = auth.endpoints();
        assert_eq!(endpoints.len(), 5);
        assert!(endpoints
            .iter()
            .any(|e| e.path == "/connect/github/revoke" && e.flow == FlowKind::Disconnect));
        assert!(endpoints
            .iter()
            .filter(|e| e.require_auth)
            .all(|e| matches!(e.flow, FlowKind::Connect | FlowKind::Disconnect)));
    }

    #[test]
    fn setup_builds_a_strategy() {
        let auth = GithubAuth::new(options()).unwrap();
        assert!(auth.setup().is_ok());
    }
}
