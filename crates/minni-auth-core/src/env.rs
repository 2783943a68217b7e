// Environment detection and environment-based configuration.

use std::sync::OnceLock;

use crate::options::GithubAuthOptions;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

/// Detect the current environment mode.
/// Checks `MINNI_ENV` then `RUST_ENV`.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("MINNI_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default()
            .to_lowercase();

        match env_val.as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

pub fn is_development() -> bool {
    detect_env_mode() == EnvMode::Development
}

pub fn is_test() -> bool {
    detect_env_mode() == EnvMode::Test
}

/// Build plugin options from environment variables.
///
/// Reads `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET` and
/// `GITHUB_CALLBACK_URL` (all required), plus an optional comma-separated
/// `GITHUB_SCOPE`. Returns `None` when any required variable is absent;
/// the caller still runs `validate()` on the result.
pub fn options_from_env() -> Option<GithubAuthOptions> {
    let id = std::env::var("GITHUB_CLIENT_ID").ok()?;
    let secret = std::env::var("GITHUB_CLIENT_SECRET").ok()?;
    let callback = std::env::var("GITHUB_CALLBACK_URL").ok()?;

    let mut options = GithubAuthOptions::new(id, secret, callback);
    if let Ok(scope) = std::env::var("GITHUB_SCOPE") {
        options.scope = scope
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    Some(options)
}
