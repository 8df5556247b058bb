use async_trait::async_trait;
use imgkeep_core::models::{Image, NewImage, NewUser, Order, User};
use imgkeep_core::AppError;
use uuid::Uuid;

/// Trait for image record persistence
///
/// Lookups that miss return `AppError::NotFound`; creating an image whose name
/// is already taken returns `AppError::Duplicate`.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// List images ordered by creation time.
    async fn get(&self, limit: i64, offset: i64, order: Order) -> Result<Vec<Image>, AppError>;

    async fn get_one(&self, image_id: Uuid) -> Result<Image, AppError>;

    async fn get_one_by_name(&self, name: &str) -> Result<Image, AppError>;

    async fn does_image_exist(&self, name: &str) -> Result<bool, AppError>;

    async fn create(&self, image: NewImage) -> Result<Image, AppError>;

    async fn set_name_by_id(&self, image_id: Uuid, new_name: &str) -> Result<Image, AppError>;

    /// Replace the stored content of `image.id`, keeping its creation time.
    async fn update_one(&self, image: Image) -> Result<Image, AppError>;

    async fn delete_one(&self, image_id: Uuid) -> Result<(), AppError>;
}

/// Trait for user record persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_username(&self, username: &str) -> Result<User, AppError>;

    /// Returns `AppError::Duplicate` when the username already exists.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
}
