//! In-memory repositories
//!
//! Process-local implementations of the repository traits, used by tests and
//! local runs without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use imgkeep_core::models::{Image, NewImage, NewUser, Order, User};
use imgkeep_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{ImageRepository, UserRepository};

#[derive(Clone, Default)]
pub struct InMemoryImageRepository {
    images: Arc<RwLock<HashMap<Uuid, Image>>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }

    /// Insert a fully formed record as is, replacing any record with its id.
    pub async fn insert(&self, image: Image) {
        self.images.write().await.insert(image.id, image);
    }
}

fn image_not_found(image_id: Uuid) -> AppError {
    AppError::NotFound(format!("Image {} not found", image_id))
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn get(&self, limit: i64, offset: i64, order: Order) -> Result<Vec<Image>, AppError> {
        let images = self.images.read().await;
        let mut listed: Vec<Image> = images.values().cloned().collect();

        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        if order == Order::Descending {
            listed.reverse();
        }

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(listed.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_one(&self, image_id: Uuid) -> Result<Image, AppError> {
        self.images
            .read()
            .await
            .get(&image_id)
            .cloned()
            .ok_or_else(|| image_not_found(image_id))
    }

    async fn get_one_by_name(&self, name: &str) -> Result<Image, AppError> {
        self.images
            .read()
            .await
            .values()
            .find(|image| image.name == name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", name)))
    }

    async fn does_image_exist(&self, name: &str) -> Result<bool, AppError> {
        Ok(self
            .images
            .read()
            .await
            .values()
            .any(|image| image.name == name))
    }

    async fn create(&self, image: NewImage) -> Result<Image, AppError> {
        let mut images = self.images.write().await;

        if images.values().any(|existing| existing.name == image.name) {
            return Err(AppError::Duplicate(format!("image name {}", image.name)));
        }

        let created = Image {
            id: Uuid::new_v4(),
            name: image.name,
            format: image.format,
            original: image.original,
            domain: image.domain,
            path: image.path,
            sizes: image.sizes,
            created_at: Some(Utc::now()),
            updated_at: None,
            author_id: image.author_id,
        };
        images.insert(created.id, created.clone());

        tracing::debug!(image_id = %created.id, name = %created.name, "Image created");
        Ok(created)
    }

    async fn set_name_by_id(&self, image_id: Uuid, new_name: &str) -> Result<Image, AppError> {
        let mut images = self.images.write().await;

        if images
            .values()
            .any(|existing| existing.id != image_id && existing.name == new_name)
        {
            return Err(AppError::Duplicate(format!("image name {}", new_name)));
        }

        let image = images
            .get_mut(&image_id)
            .ok_or_else(|| image_not_found(image_id))?;
        image.name = new_name.to_string();
        image.updated_at = Some(Utc::now());

        Ok(image.clone())
    }

    async fn update_one(&self, image: Image) -> Result<Image, AppError> {
        let mut images = self.images.write().await;

        if images
            .values()
            .any(|existing| existing.id != image.id && existing.name == image.name)
        {
            return Err(AppError::Duplicate(format!("image name {}", image.name)));
        }

        let stored = images
            .get_mut(&image.id)
            .ok_or_else(|| image_not_found(image.id))?;
        let created_at = stored.created_at;
        *stored = Image {
            created_at,
            updated_at: Some(Utc::now()),
            ..image
        };

        Ok(stored.clone())
    }

    async fn delete_one(&self, image_id: Uuid) -> Result<(), AppError> {
        self.images
            .write()
            .await
            .remove(&image_id)
            .map(|_| ())
            .ok_or_else(|| image_not_found(image_id))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<User, AppError> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User not found by username {}", username)))
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(AppError::Duplicate(format!("username {}", user.username)));
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            role: user.role,
            username: user.username,
            subject: user.subject,
            display_name: user.display_name,
            disabled: user.disabled,
            created_at: Utc::now(),
            updated_at: None,
        };
        users.insert(created.username.clone(), created.clone());

        Ok(created)
    }
}
