use async_trait::async_trait;
use imgkeep_core::models::UserAttributes;
use imgkeep_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of extended user attributes, keyed by username.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_user_attributes(&self, username: &str) -> Result<UserAttributes, AppError>;
}

/// Identity provider backed by a process-local map.
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    users: Arc<RwLock<HashMap<String, UserAttributes>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, attributes: UserAttributes) {
        self.users
            .write()
            .await
            .insert(attributes.username.clone(), attributes);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn get_user_attributes(&self, username: &str) -> Result<UserAttributes, AppError> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| {
                AppError::IdentityProvider(format!("unknown user {}", username))
            })
    }
}
