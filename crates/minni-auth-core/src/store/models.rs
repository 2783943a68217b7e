// The user record, as the host application persists it.
//
// The plugin only reads and writes a few fields opportunistically: the
// email, display name and avatar at signup, and the provider map when
// linking or unlinking an identity provider.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user record.
///
/// `providers` maps a provider name to the identifier that provider
/// assigned to the user, e.g. `{ "github": "12345" }`. A user may or may
/// not have any given provider attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub providers: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Provider-assigned identifier for `provider`, if the user has one.
    pub fn provider_id(&self, provider: &str) -> Option<&str> {
        self.providers.get(provider).map(String::as_str)
    }

    /// Attach (or replace) a provider identifier.
    pub fn set_provider(&mut self, provider: impl Into<String>, provider_id: impl Into<String>) {
        self.providers.insert(provider.into(), provider_id.into());
    }

    /// Detach a provider. Returns the removed identifier, if any.
    pub fn remove_provider(&mut self, provider: &str) -> Option<String> {
        self.providers.remove(provider)
    }
}

/// Data for creating a user record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub providers: HashMap<String, String>,
}
