use async_trait::async_trait;
use imgkeep_core::models::{AuthorizationContext, NewUser, User};
use imgkeep_core::AppError;
use imgkeep_db::UserRepository;
use std::sync::Arc;

use crate::identity::IdentityProvider;

/// Resolves the authenticated caller to a stored user.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn get_or_sync_user(&self, authorization: &AuthorizationContext)
        -> Result<User, AppError>;
}

/// Authenticator that creates missing users from identity provider attributes.
///
/// A `Duplicate` from the repository, e.g. when two first requests of the same
/// user race, is returned to the caller as is.
pub struct UserSyncAuthenticator {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl UserSyncAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { users, identity }
    }
}

#[async_trait]
impl Authenticator for UserSyncAuthenticator {
    async fn get_or_sync_user(
        &self,
        authorization: &AuthorizationContext,
    ) -> Result<User, AppError> {
        match self.users.get_by_username(&authorization.username).await {
            Ok(user) => return Ok(user),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        tracing::info!(username = %authorization.username, "Syncing user from identity provider");

        let attributes = self
            .identity
            .get_user_attributes(&authorization.username)
            .await?;

        let new_user = NewUser {
            email: attributes.email,
            role: authorization.role,
            username: attributes.username,
            subject: attributes.subject,
            display_name: attributes.display_name,
            disabled: false,
        };

        let user = self.users.create(new_user).await.map_err(|e| {
            tracing::warn!(
                username = %authorization.username,
                error = %e,
                "Failed to store synced user"
            );
            e
        })?;

        tracing::debug!(user_id = %user.id, "User synced");
        Ok(user)
    }
}
