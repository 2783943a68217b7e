// SessionStore trait: the session seam the host application fills.
//
// The plugin needs three things from the host's session layer: who the
// current session belongs to, a fresh session once a sign-in succeeds, and
// the one-shot "return to" URL a flow should land on after finishing.
// Storage itself stays on the host side.

use async_trait::async_trait;

use crate::store::user_store::StoreResult;

/// Access to the host's session layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The user id the session token belongs to, if the session is live.
    async fn user_id_for(&self, token: &str) -> StoreResult<Option<String>>;

    /// Establish a session for `user_id`, returning the new token.
    async fn create_for(&self, user_id: &str) -> StoreResult<String>;

    /// Take the session's stored return-to URL, clearing it.
    async fn take_return_to(&self, token: &str) -> StoreResult<Option<String>>;
}
