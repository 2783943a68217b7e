// GitHub profile types: the raw shapes `api.github.com` returns and the
// accessors the verify step needs.

use serde::{Deserialize, Serialize};

/// A GitHub user profile, as returned by `GET /user`.
///
/// The provider-assigned identifier is the numeric `id`; it is carried as a
/// string everywhere else since that is how the provider map stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubProfile {
    /// GitHub's numeric account id.
    pub id: u64,
    /// The login handle (e.g. "octocat").
    pub login: String,
    /// The display name, which GitHub users may leave unset.
    #[serde(default)]
    pub name: Option<String>,
    /// The publicly visible email, often null.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl GithubProfile {
    /// The provider-assigned identifier, as stored in the provider map.
    pub fn provider_id(&self) -> String {
        self.id.to_string()
    }

    /// Display name, falling back to the login handle.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// One entry of `GET /user/emails`, used when the public email is null.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

/// Pick the best email from a `/user/emails` listing: the primary verified
/// address, else any verified one.
pub fn pick_email(emails: &[GithubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| emails.iter().find(|e| e.verified))
        .map(|e| e.email.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_github_user_payload() {
        let profile: GithubProfile = serde_json::from_value(serde_json::json!({
            "id": 583231,
            "login": "octocat",
            "name": "The Octocat",
            "email": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "company": "GitHub",
            "public_repos": 8,
        }))
        .unwrap();

        assert_eq!(profile.provider_id(), "583231");
        assert_eq!(profile.display_name(), "The Octocat");
        assert!(profile.email.is_none());
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let profile: GithubProfile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "login": "ghost",
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "ghost");
    }

    #[test]
    fn pick_email_prefers_primary_verified() {
        let emails = vec![
            GithubEmail {
                email: "old@example.com".into(),
                primary: false,
                verified: true,
            },
            GithubEmail {
                email: "ada@minni.im".into(),
                primary: true,
                verified: true,
            },
        ];
        assert_eq!(pick_email(&emails).as_deref(), Some("ada@minni.im"));
    }

    #[test]
    fn pick_email_skips_unverified() {
        let emails = vec![GithubEmail {
            email: "spoofed@example.com".into(),
            primary: true,
            verified: false,
        }];
        assert!(pick_email(&emails).is_none());
    }
}
