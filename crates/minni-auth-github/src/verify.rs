// The verify step: resolves a GitHub profile into a local user once the
// handshake has completed.
//
// Three branches, selected by the recorded auth action:
// - Login: the user must already exist with this provider id.
// - Connect: attach the provider id to the signed-in user.
// - Signup: create a user from the profile.

use std::collections::HashMap;

use minni_auth_core::store::models::{NewUser, User};
use minni_auth_core::store::user_store::UserStore;

use crate::error::GithubAuthError;
use crate::profile::GithubProfile;
use crate::state::AuthAction;

/// Registry key of this provider in the user's provider map.
pub const PROVIDER_NAME: &str = "github";

/// What the verify step resolved the profile to.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Login matched an existing user.
    SignedIn(User),
    /// Login found nobody with this provider id.
    Unknown { message: String },
    /// Connect attached the provider to the signed-in user.
    Linked { user: User, message: String },
    /// Signup created a fresh user.
    Registered(User),
}

impl VerifyOutcome {
    /// The resolved user, when the outcome carries one.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) | Self::Registered(user) => Some(user),
            Self::Linked { user, .. } => Some(user),
            Self::Unknown { .. } => None,
        }
    }
}

/// Resolve a verified GitHub profile against the host's user store.
pub async fn verify(
    action: AuthAction,
    current_user: Option<User>,
    profile: &GithubProfile,
    store: &dyn UserStore,
) -> Result<VerifyOutcome, GithubAuthError> {
    match action {
        AuthAction::Login => {
            match store
                .find_by_provider_id(PROVIDER_NAME, &profile.provider_id())
                .await?
            {
                Some(user) => Ok(VerifyOutcome::SignedIn(user)),
                None => Ok(VerifyOutcome::Unknown {
                    message: format!(
                        "Sorry we don't know any « {} » from Github. \
                         You first need to signup before trying to login",
                        profile.display_name()
                    ),
                }),
            }
        }

        AuthAction::Connect => {
            let mut user = current_user.ok_or(GithubAuthError::AuthenticationRequired)?;
            user.set_provider(PROVIDER_NAME, profile.provider_id());
            let user = store.save(user).await?;
            Ok(VerifyOutcome::Linked {
                user,
                message: "Successfully registered Github as an authentication provider".into(),
            })
        }

        AuthAction::Signup => {
            let email = profile
                .email
                .clone()
                .ok_or_else(|| GithubAuthError::MissingEmail(profile.display_name().to_string()))?;

            let mut providers = HashMap::new();
            providers.insert(PROVIDER_NAME.to_string(), profile.provider_id());

            let user = store
                .create(NewUser {
                    email,
                    fullname: Some(profile.display_name().to_string()),
                    avatar: profile.avatar_url.clone(),
                    providers,
                })
                .await?;
            Ok(VerifyOutcome::Registered(user))
        }
    }
}

/// Detach GitHub from the user and persist the change.
///
/// Returns the saved user and the flash message to show. Detaching when no
/// link exists is a plain save.
pub async fn disconnect(
    mut user: User,
    store: &dyn UserStore,
) -> Result<(User, String), GithubAuthError> {
    user.remove_provider(PROVIDER_NAME);
    let user = store.save(user).await?;
    Ok((
        user,
        "Github has been successfully unlinked from your account.".into(),
    ))
}
