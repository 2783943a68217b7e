// End-to-end plugin tests: a stubbed strategy stands in for GitHub, the
// in-memory store stands in for the host's persistence. Exercises the full
// signup → login → connect → disconnect lifecycle.

use async_trait::async_trait;

use minni_auth_core::options::GithubAuthOptions;
use minni_auth_core::store::memory::MemoryUserStore;
use minni_auth_core::store::user_store::UserStore;
use minni_auth_github::strategy::AuthorizationRequest;
use minni_auth_github::{
    disconnect, verify, AuthAction, FlowState, GithubAuth, GithubAuthError, GithubProfile,
    GithubStrategy, VerifyOutcome, PROVIDER_NAME,
};

/// Stub strategy: canned token and profile, no network.
#[derive(Debug)]
struct StubStrategy {
    profile: GithubProfile,
}

impl StubStrategy {
    fn new(profile: GithubProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl GithubStrategy for StubStrategy {
    fn authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            url: "https://github.com/login/oauth/authorize?state=stub-state".into(),
            state: "stub-state".into(),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, GithubAuthError> {
        if code == "good-code" {
            Ok("gho_stubtoken".into())
        } else {
            Err(GithubAuthError::TokenExchange("bad code".into()))
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, GithubAuthError> {
        if access_token == "gho_stubtoken" {
            Ok(self.profile.clone())
        } else {
            Err(GithubAuthError::ProfileParse)
        }
    }
}

fn octocat() -> GithubProfile {
    serde_json::from_value(serde_json::json!({
        "id": 583231,
        "login": "octocat",
        "name": "The Octocat",
        "email": "octocat@github.com",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
    }))
    .unwrap()
}

/// Run the callback half of a flow: state check, code exchange, profile
/// fetch, verify.
async fn run_callback(
    strategy: &dyn GithubStrategy,
    store: &MemoryUserStore,
    flow: &FlowState,
    returned_state: &str,
    code: &str,
    current_user: Option<minni_auth_core::store::models::User>,
) -> Result<VerifyOutcome, GithubAuthError> {
    flow.verify_state(returned_state)?;
    let token = strategy.exchange_code(code).await?;
    let profile = strategy.fetch_profile(&token).await?;
    verify(flow.action, current_user, &profile, store).await
}

#[tokio::test]
async fn signup_then_login_round_trip() {
    let strategy = StubStrategy::new(octocat());
    let store = MemoryUserStore::new();

    // Signup: no recorded action, no current user.
    let flow = FlowState::new(AuthAction::Signup, strategy.authorization_request().state);
    let outcome = run_callback(&strategy, &store, &flow, "stub-state", "good-code", None)
        .await
        .unwrap();
    let registered = match outcome {
        VerifyOutcome::Registered(user) => user,
        other => panic!("expected Registered, got {other:?}"),
    };
    assert_eq!(registered.provider_id(PROVIDER_NAME), Some("583231"));

    // Login: finds the user just registered.
    let flow = FlowState::new(AuthAction::Login, "stub-state");
    let outcome = run_callback(&strategy, &store, &flow, "stub-state", "good-code", None)
        .await
        .unwrap();
    match outcome {
        VerifyOutcome::SignedIn(user) => assert_eq!(user.id, registered.id),
        other => panic!("expected SignedIn, got {other:?}"),
    }
}

#[tokio::test]
async fn login_before_signup_fails_with_a_message() {
    let strategy = StubStrategy::new(octocat());
    let store = MemoryUserStore::new();

    let flow = FlowState::new(AuthAction::Login, "stub-state");
    let outcome = run_callback(&strategy, &store, &flow, "stub-state", "good-code", None)
        .await
        .unwrap();

    match outcome {
        VerifyOutcome::Unknown { message } => {
            assert!(message.contains("The Octocat"));
        }
        other => panic!("expected Unknown, got {other:?}"),
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn connect_then_disconnect_lifecycle() {
    let strategy = StubStrategy::new(octocat());
    let store = MemoryUserStore::new();

    let existing = store
        .create(minni_auth_core::store::models::NewUser {
            email: "ada@minni.im".into(),
            fullname: Some("Ada".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let flow = FlowState::new(AuthAction::Connect, "stub-state");
    let outcome = run_callback(
        &strategy,
        &store,
        &flow,
        "stub-state",
        "good-code",
        Some(existing.clone()),
    )
    .await
    .unwrap();

    let linked = match outcome {
        VerifyOutcome::Linked { user, .. } => user,
        other => panic!("expected Linked, got {other:?}"),
    };
    assert_eq!(linked.id, existing.id);
    assert_eq!(linked.provider_id(PROVIDER_NAME), Some("583231"));

    let (unlinked, message) = disconnect(linked, &store).await.unwrap();
    assert!(unlinked.provider_id(PROVIDER_NAME).is_none());
    assert!(message.contains("unlinked"));

    // The store saw the removal too.
    let reloaded = store.find_by_id(&unlinked.id).await.unwrap().unwrap();
    assert!(reloaded.provider_id(PROVIDER_NAME).is_none());
}

#[tokio::test]
async fn forged_state_stops_the_flow_before_any_exchange() {
    let strategy = StubStrategy::new(octocat());
    let store = MemoryUserStore::new();

    let flow = FlowState::new(AuthAction::Login, "stub-state");
    let err = run_callback(&strategy, &store, &flow, "forged", "good-code", None)
        .await
        .unwrap_err();
    assert!(matches!(err, GithubAuthError::StateMismatch));
}

#[tokio::test]
async fn failed_exchange_propagates() {
    let strategy = StubStrategy::new(octocat());
    let store = MemoryUserStore::new();

    let flow = FlowState::new(AuthAction::Signup, "stub-state");
    let err = run_callback(&strategy, &store, &flow, "stub-state", "bad-code", None)
        .await
        .unwrap_err();
    assert!(matches!(err, GithubAuthError::TokenExchange(_)));
    assert!(store.is_empty().await);
}

#[test]
fn plugin_construction_validates_options() {
    assert!(GithubAuth::new(GithubAuthOptions::new("id", "secret", "relative/path")).is_err());
    assert!(GithubAuth::new(GithubAuthOptions::new(
        "id",
        "secret",
        "https://minni.im/auth/github/callback"
    ))
    .is_ok());
}
