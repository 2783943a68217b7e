// Flow state: the per-request flag that records which action an outgoing
// authorization request belongs to, plus the CSRF state to check on the way
// back. Travels in a short-lived cookie owned by the integration layer.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::GithubAuthError;

/// Which action the flow was started for.
///
/// `Signup` is the branch taken when a callback arrives with no recorded
/// action and no signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Login,
    Connect,
    Signup,
}

/// State recorded between the outgoing redirect and the provider callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub action: AuthAction,
    /// CSRF state the strategy put in the authorization URL.
    pub state: String,
}

impl FlowState {
    pub fn new(action: AuthAction, state: impl Into<String>) -> Self {
        Self {
            action,
            state: state.into(),
        }
    }

    /// Cookie-safe encoding (base64url over JSON).
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(raw: &str) -> Result<Self, GithubAuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw)
            .map_err(|_| GithubAuthError::StateMismatch)?;
        serde_json::from_slice(&bytes).map_err(|_| GithubAuthError::StateMismatch)
    }

    /// Check the state returned by the provider against the recorded one.
    pub fn verify_state(&self, returned: &str) -> Result<(), GithubAuthError> {
        if self.state == returned {
            Ok(())
        } else {
            Err(GithubAuthError::StateMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let flow = FlowState::new(AuthAction::Login, "abc123");
        let decoded = FlowState::decode(&flow.encode()).unwrap();
        assert_eq!(decoded.action, AuthAction::Login);
        assert_eq!(decoded.state, "abc123");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(FlowState::decode("not-base64!!").is_err());
        assert!(FlowState::decode("aGVsbG8").is_err());
    }

    #[test]
    fn verify_state_rejects_mismatch() {
        let flow = FlowState::new(AuthAction::Connect, "expected");
        assert!(flow.verify_state("expected").is_ok());
        assert!(matches!(
            flow.verify_state("forged"),
            Err(GithubAuthError::StateMismatch)
        ));
    }

    #[test]
    fn action_serializes_lowercase() {
        let json = serde_json::to_value(AuthAction::Signup).unwrap();
        assert_eq!(json, "signup");
    }
}
