#![doc = include_str!("../README.md")]

pub mod cookies;
pub mod flash;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use minni_auth_core::error::AuthError;
use minni_auth_core::logger::{AuthLogger, LoggerConfig};
use minni_auth_core::options::GithubAuthOptions;
use minni_auth_core::store::models::User;
use minni_auth_core::store::session::SessionStore;
use minni_auth_core::store::user_store::UserStore;
use minni_auth_github::{
    disconnect, verify, AuthAction, FlowState, GithubAuth, GithubAuthError, GithubStrategy,
    VerifyOutcome,
};

use crate::cookies::{read_cookie, SetCookie, FLOW_COOKIE, SESSION_COOKIE};
use crate::flash::Flash;

/// Shared state behind the auth routes.
#[derive(Clone)]
struct AuthState {
    options: GithubAuthOptions,
    strategy: Arc<dyn GithubStrategy>,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    logger: AuthLogger,
}

/// Mounts the GitHub sign-in flows on an Axum router.
///
/// ```rust,ignore
/// let auth = GithubAuth::new(options)?;
/// let app = Router::new().merge(MinniAuth::new(&auth, users, sessions)?.router());
/// ```
pub struct MinniAuth {
    state: AuthState,
}

impl MinniAuth {
    /// Wire the plugin with its production strategy.
    pub fn new(
        plugin: &GithubAuth,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, GithubAuthError> {
        let strategy = Arc::new(plugin.setup()?);
        Ok(Self::with_strategy(
            plugin.options().clone(),
            strategy,
            users,
            sessions,
        ))
    }

    /// Wire an explicit strategy (tests substitute a stub here).
    pub fn with_strategy(
        options: GithubAuthOptions,
        strategy: Arc<dyn GithubStrategy>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            state: AuthState {
                options,
                strategy,
                users,
                sessions,
                logger: AuthLogger::new(LoggerConfig::from_env()),
            },
        }
    }

    pub fn with_logger(mut self, logger: AuthLogger) -> Self {
        self.state.logger = logger;
        self
    }

    /// The router carrying all plugin routes, ready to merge into the host
    /// application.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/login/github", get(handle_login))
            .route("/signup/github", get(handle_signup))
            .route("/auth/github/callback", get(handle_callback))
            .route("/connect/github", get(handle_connect))
            .route("/connect/github/revoke", get(handle_revoke))
            .with_state(self.state.clone())
    }
}

// ─── Responses ───────────────────────────────────────────────────

fn redirect_with(url: &str, cookies: Vec<SetCookie>) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, url);
    for cookie in cookies {
        builder = builder.header(header::SET_COOKIE, cookie.header_value());
    }
    match builder.body(Body::empty()) {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Redirect to the flow's failure target, leaving a flash message when the
/// options ask for one. The connect flow fails towards the profile page.
fn failure(state: &AuthState, action: Option<AuthAction>, message: &str) -> Response {
    let target = match action {
        Some(AuthAction::Connect) => "/profile",
        _ => state.options.failure_redirect.as_str(),
    };

    let mut cookies = vec![SetCookie::clear_flow()];
    if state.options.failure_flash {
        cookies.push(SetCookie::flash(Flash::error(message).encode()));
    }
    redirect_with(target, cookies)
}

// ─── Request helpers ─────────────────────────────────────────────

fn read_flow(headers: &HeaderMap) -> Option<FlowState> {
    let raw = read_cookie(headers, FLOW_COOKIE)?;
    let decoded = urlencoding::decode(&raw).ok()?;
    FlowState::decode(&decoded).ok()
}

/// Resolve the signed-in user through the host's session layer.
async fn current_user(state: &AuthState, sid: Option<&str>) -> Result<Option<User>, AuthError> {
    let Some(sid) = sid else { return Ok(None) };
    let Some(user_id) = state.sessions.user_id_for(sid).await? else {
        return Ok(None);
    };
    state.users.find_by_id(&user_id).await
}

/// Take the session's return-to target, logging (not failing) on store
/// trouble.
async fn take_return_to(state: &AuthState, sid: Option<&str>) -> Option<String> {
    let sid = sid?;
    match state.sessions.take_return_to(sid).await {
        Ok(url) => url,
        Err(e) => {
            state.logger.warn(&format!("failed to read return-to: {e}"));
            None
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────────

/// Start an outgoing authorization request with the given action recorded
/// in the flow cookie.
fn start_flow(state: &AuthState, action: AuthAction) -> Response {
    let request = state.strategy.authorization_request();
    let flow = FlowState::new(action, request.state);
    state
        .logger
        .debug(&format!("starting github {action:?} flow"));
    redirect_with(&request.url, vec![SetCookie::flow(flow.encode())])
}

async fn handle_login(State(state): State<AuthState>) -> Response {
    start_flow(&state, AuthAction::Login)
}

async fn handle_signup(State(state): State<AuthState>) -> Response {
    start_flow(&state, AuthAction::Signup)
}

async fn handle_connect(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let sid = read_cookie(&headers, SESSION_COOKIE);
    match current_user(&state, sid.as_deref()).await {
        Ok(Some(_)) => start_flow(&state, AuthAction::Connect),
        Ok(None) => failure(&state, Some(AuthAction::Connect), "Authentication required"),
        Err(e) => {
            state.logger.error(&format!("session lookup failed: {e}"));
            failure(&state, Some(AuthAction::Connect), "Authentication required")
        }
    }
}

/// Query parameters GitHub sends to the callback.
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn handle_callback(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // The flow cookie carries the recorded action and the expected state.
    let Some(flow) = read_flow(&headers) else {
        state.logger.warn("callback without a flow cookie");
        return failure(&state, None, "State mismatch on callback");
    };

    if let Some(ref error) = query.error {
        let mut detail = error.clone();
        if let Some(ref description) = query.error_description {
            detail.push_str(&format!(": {description}"));
        }
        let err = GithubAuthError::ProviderDenied(detail);
        state.logger.warn(&format!("[{:?}] {err}", err.code()));
        return failure(&state, Some(flow.action), &err.to_string());
    }

    let returned_state = query.state.as_deref().unwrap_or_default();
    if flow.verify_state(returned_state).is_err() {
        state.logger.warn("callback state mismatch");
        return failure(&state, Some(flow.action), "State mismatch on callback");
    }

    let Some(code) = query.code else {
        return failure(&state, Some(flow.action), "Missing authorization code");
    };

    let access_token = match state.strategy.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            state
                .logger
                .error(&format!("[{:?}] code exchange failed: {e}", e.code()));
            return failure(&state, Some(flow.action), "Failed to sign in with Github");
        }
    };

    let profile = match state.strategy.fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            state
                .logger
                .error(&format!("[{:?}] profile fetch failed: {e}", e.code()));
            return failure(&state, Some(flow.action), "Failed to sign in with Github");
        }
    };

    let sid = read_cookie(&headers, SESSION_COOKIE);
    let user = match current_user(&state, sid.as_deref()).await {
        Ok(user) => user,
        Err(e) => {
            state.logger.error(&format!("session lookup failed: {e}"));
            return failure(&state, Some(flow.action), "Failed to sign in with Github");
        }
    };

    // A recorded login stays a login; otherwise a signed-in user means
    // connect, and nobody signed in means signup.
    let action = match flow.action {
        AuthAction::Login => AuthAction::Login,
        _ if user.is_some() => AuthAction::Connect,
        _ => AuthAction::Signup,
    };

    let outcome = match verify(action, user, &profile, state.users.as_ref()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.logger.error(&format!("verify failed: {e}"));
            return failure(&state, Some(action), &e.to_string());
        }
    };

    match outcome {
        VerifyOutcome::SignedIn(user) | VerifyOutcome::Registered(user) => {
            let return_to = take_return_to(&state, sid.as_deref()).await;
            let token = match state.sessions.create_for(&user.id).await {
                Ok(token) => token,
                Err(e) => {
                    state.logger.error(&format!("failed to create session: {e}"));
                    return failure(&state, Some(action), "Failed to sign in with Github");
                }
            };
            state
                .logger
                .success(&format!("github sign-in for {}", user.email));
            redirect_with(
                return_to
                    .as_deref()
                    .unwrap_or(&state.options.success_redirect),
                vec![SetCookie::clear_flow(), SetCookie::session(token)],
            )
        }

        VerifyOutcome::Linked { message, .. } => {
            state.logger.success(&message);
            redirect_with(
                &state.options.success_redirect,
                vec![
                    SetCookie::clear_flow(),
                    SetCookie::flash(Flash::info(message).encode()),
                ],
            )
        }

        VerifyOutcome::Unknown { message } => {
            state.logger.warn(&message);
            failure(&state, Some(AuthAction::Login), &message)
        }
    }
}

async fn handle_revoke(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let sid = read_cookie(&headers, SESSION_COOKIE);
    let user = match current_user(&state, sid.as_deref()).await {
        Ok(Some(user)) => user,
        Ok(None) => return failure(&state, None, "Authentication required"),
        Err(e) => {
            state.logger.error(&format!("session lookup failed: {e}"));
            return failure(&state, None, "Authentication required");
        }
    };

    match disconnect(user, state.users.as_ref()).await {
        Ok((_, message)) => {
            let return_to = take_return_to(&state, sid.as_deref()).await;
            redirect_with(
                return_to.as_deref().unwrap_or("/profile"),
                vec![SetCookie::flash(Flash::info(message).encode())],
            )
        }
        Err(e) => {
            state.logger.error(&format!("failed to unlink github: {e}"));
            redirect_with(
                "/profile",
                vec![SetCookie::flash(
                    Flash::error("Failed to unlink Github from your account.").encode(),
                )],
            )
        }
    }
}
