// In-memory store implementations: HashMap-based, thread-safe via
// tokio::sync::RwLock. Used by tests and examples; a real host wires its
// own persistence behind the same traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::AuthError;
use crate::store::models::{NewUser, User};
use crate::store::session::SessionStore;
use crate::store::user_store::{StoreResult, UserStore};

/// In-memory user store.
///
/// Data is lost when the store is dropped. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built user record, for test fixtures.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Snapshot of all users, for assertions.
    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_provider_id(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.provider_id(provider) == Some(provider_id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: data.email.to_lowercase(),
            fullname: data.fullname,
            avatar: data.avatar,
            providers: data.providers,
            created_at: now,
            updated_at: now,
        };
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn save(&self, mut user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AuthError::Store(format!("no such user: {}", user.id)));
        }
        user.updated_at = Utc::now();
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

/// Per-session data tracked by the in-memory session store.
#[derive(Debug, Clone, Default)]
struct SessionData {
    user_id: Option<String>,
    return_to: Option<String>,
}

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a logged-in session, for test fixtures.
    pub async fn insert(&self, token: impl Into<String>, user_id: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(token.into()).or_default().user_id = Some(user_id.into());
    }

    /// Stash a return-to URL on a session.
    pub async fn set_return_to(&self, token: &str, url: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(token.to_string()).or_default().return_to = Some(url.into());
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn user_id_for(&self, token: &str) -> StoreResult<Option<String>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token).and_then(|s| s.user_id.clone()))
    }

    async fn create_for(&self, user_id: &str) -> StoreResult<String> {
        let token = crate::utils::random::generate_random_string(32);
        let mut sessions = self.sessions.write().await;
        sessions.entry(token.clone()).or_default().user_id = Some(user_id.to_string());
        Ok(token)
    }

    async fn take_return_to(&self, token: &str) -> StoreResult<Option<String>> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.get_mut(token).and_then(|s| s.return_to.take()))
    }
}
