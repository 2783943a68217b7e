// UserStore trait: the user-persistence seam the host application fills.
//
// The plugin looks a user up by provider identifier, creates one at signup,
// and saves provider-map mutations. Nothing else.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::store::models::{NewUser, User};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, AuthError>;

/// The user-persistence API supplied by the host application.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user holding `provider_id` for `provider`
    /// (e.g. `find_by_provider_id("github", "12345")`).
    async fn find_by_provider_id(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> StoreResult<Option<User>>;

    /// Find a user by their local id.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    /// Create a new user record. The store assigns the id and timestamps.
    async fn create(&self, data: NewUser) -> StoreResult<User>;

    /// Persist changes to an existing user, returning the stored record.
    async fn save(&self, user: User) -> StoreResult<User>;
}
