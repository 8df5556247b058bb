//! Image lifecycle workflows
//!
//! `ImagesService` coordinates the image repository, the resize service and
//! the authenticator. It holds no state of its own beyond the collaborator
//! handles, so one instance is shared across all requests.
//!
//! Workflows abort on the first failing step and do not roll back remote side
//! effects of earlier steps. The only tolerated failure is the CDN
//! invalidation during delete.

use bytes::Bytes;
use imgkeep_auth::Authenticator;
use imgkeep_core::models::{
    AuthorizationContext, DeleteRequest, Image, ImageFormat, NewImage, Order, RenameRequest,
    ResizeRequest, ResizeResult, SignedUploadSlot,
};
use imgkeep_core::{format_for_seo, AppError};
use imgkeep_db::ImageRepository;
use imgkeep_resize::Resizer;
use std::sync::Arc;
use uuid::Uuid;

use crate::fan_out::join_pair;

/// The two files of an image upload, sharing one format.
#[derive(Debug, Clone)]
pub struct ImageFiles {
    pub format: ImageFormat,
    pub original: Bytes,
    pub cropped: Bytes,
}

/// Requested changes to an existing image. An empty name counts as no change.
#[derive(Debug, Clone, Default)]
pub struct ImageUpdate {
    pub name: Option<String>,
    pub files: Option<ImageFiles>,
}

#[derive(Clone)]
pub struct ImagesService {
    images: Arc<dyn ImageRepository>,
    resizer: Arc<dyn Resizer>,
    authenticator: Arc<dyn Authenticator>,
}

fn parse_image_id(image_id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(image_id).map_err(|_| AppError::InvalidArgument("Invalid uuid".to_string()))
}

fn seo_name(name: &str) -> Result<String, AppError> {
    let seo = format_for_seo(name);
    if seo.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "Invalid image name of {}",
            name
        )));
    }
    Ok(seo)
}

fn delete_request_for(image: &Image) -> DeleteRequest {
    DeleteRequest {
        name: image.name.clone(),
        format: image.format,
        dimensions: image.sizes.all_dimensions(),
    }
}

impl ImagesService {
    pub fn new(
        images: Arc<dyn ImageRepository>,
        resizer: Arc<dyn Resizer>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            images,
            resizer,
            authenticator,
        }
    }

    /// Upload both files through the resize service and store the new image.
    pub async fn upload_and_resize(
        &self,
        authorization: &AuthorizationContext,
        name: &str,
        files: ImageFiles,
    ) -> Result<Image, AppError> {
        let name = seo_name(name)?;

        let user = self.authenticator.get_or_sync_user(authorization).await?;

        match self.images.does_image_exist(&name).await {
            Ok(false) => {}
            Ok(true) => {
                return Err(AppError::InvalidArgument(format!(
                    "Image name: '{}' already exists, please use another",
                    name
                )));
            }
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Image existence check failed");
                return Err(AppError::InvalidArgument(format!(
                    "Image '{}' already exists",
                    name
                )));
            }
        }

        let (original_slot, cropped_slot) = self
            .fetch_upload_slots(&authorization.header, files.format)
            .await
            .map_err(|e| e.context("error creating multiple sign urls"))?;

        self.upload_both(&original_slot, &cropped_slot, files)
            .await
            .map_err(|e| e.context("error uploading files"))?;

        let resized = self
            .resize(&authorization.header, &name, &original_slot, &cropped_slot)
            .await
            .map_err(|e| e.context("error resizing"))?;

        let new_image = NewImage {
            name: resized.name,
            format: resized.format,
            original: resized.original,
            domain: resized.domain,
            path: resized.path,
            sizes: resized.sizes,
            author_id: user.id,
        };

        let created = self
            .images
            .create(new_image)
            .await
            .map_err(|e| e.context("err saving new image to database"))?;

        tracing::info!(image_id = %created.id, name = %created.name, "Image created");
        Ok(created)
    }

    pub async fn get(&self, limit: i64, offset: i64, order: Order) -> Result<Vec<Image>, AppError> {
        self.images
            .get(limit, offset, order)
            .await
            .map_err(|e| e.context("failed fetching images"))
    }

    pub async fn get_one(&self, image_id: &str) -> Result<Image, AppError> {
        let image_id = parse_image_id(image_id)?;
        self.images.get_one(image_id).await
    }

    /// Rename an image, replace its files, or both.
    pub async fn update(
        &self,
        authorization: &AuthorizationContext,
        image_id: &str,
        update: ImageUpdate,
    ) -> Result<Image, AppError> {
        let name = update.name.filter(|name| !name.is_empty());
        if name.is_none() && update.files.is_none() {
            return Err(AppError::InvalidArgument(
                "Expected at least a name change or a file change, got all empty".to_string(),
            ));
        }

        let image_id = parse_image_id(image_id)?;

        self.authenticator.get_or_sync_user(authorization).await?;

        let image = self.images.get_one(image_id).await?;

        match (name, update.files) {
            (Some(name), Some(files)) => {
                self.update_files_and_name(authorization, image, &name, files)
                    .await
            }
            (None, Some(files)) => self.update_files_only(authorization, image, files).await,
            (Some(name), None) => self.update_name_only(authorization, image, &name).await,
            (None, None) => Err(AppError::InvalidArgument(
                "Expected at least a name change or a file change, got all empty".to_string(),
            )),
        }
    }

    /// Delete an image with all its remote variants. Administrators only.
    pub async fn delete_one(
        &self,
        authorization: &AuthorizationContext,
        image_id: &str,
    ) -> Result<(), AppError> {
        let image_id = parse_image_id(image_id)?;

        let user = self.authenticator.get_or_sync_user(authorization).await?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden("Forbidden".to_string()));
        }

        let image = self.images.get_one(image_id).await?;
        let request = delete_request_for(&image);

        if let Err(e) = self
            .resizer
            .delete(&authorization.header, request.clone())
            .await
        {
            tracing::error!(image_id = %image_id, error = %e, "Failed deleting image");
            return Err(e);
        }

        if let Err(e) = self.resizer.invalidate(&authorization.header, request).await {
            tracing::warn!(image_id = %image_id, error = %e, "Failed invalidating image");
        }

        self.images.delete_one(image_id).await
    }

    async fn update_name_only(
        &self,
        authorization: &AuthorizationContext,
        image: Image,
        name: &str,
    ) -> Result<Image, AppError> {
        let new_name = seo_name(name)?;

        let request = RenameRequest {
            name: image.name.clone(),
            new_name: new_name.clone(),
            format: image.format,
            size_map: image.sizes.clone(),
        };
        self.resizer
            .rename(&authorization.header, request)
            .await
            .map_err(|e| e.context("error renaming image"))?;

        self.images.set_name_by_id(image.id, &new_name).await
    }

    /// Replace the remote files while keeping the stored record as is.
    async fn update_files_only(
        &self,
        authorization: &AuthorizationContext,
        image: Image,
        files: ImageFiles,
    ) -> Result<Image, AppError> {
        let (original_slot, cropped_slot) = self
            .fetch_upload_slots(&authorization.header, files.format)
            .await
            .map_err(|e| e.context("error creating multiple sign urls"))?;

        self.resizer
            .delete(&authorization.header, delete_request_for(&image))
            .await
            .map_err(|e| e.context("error deleting previous images"))?;

        self.upload_both(&original_slot, &cropped_slot, files)
            .await
            .map_err(|e| e.context("error uploading files"))?;

        self.resize(&authorization.header, &image.name, &original_slot, &cropped_slot)
            .await
            .map_err(|e| e.context("error resizing"))?;

        Ok(image)
    }

    async fn update_files_and_name(
        &self,
        authorization: &AuthorizationContext,
        image: Image,
        name: &str,
        files: ImageFiles,
    ) -> Result<Image, AppError> {
        let new_name = seo_name(name)?;

        let (original_slot, cropped_slot) = self
            .fetch_upload_slots(&authorization.header, files.format)
            .await
            .map_err(|e| e.context("error creating multiple sign urls"))?;

        self.upload_both(&original_slot, &cropped_slot, files)
            .await
            .map_err(|e| e.context("error uploading files"))?;

        self.resizer
            .delete(&authorization.header, delete_request_for(&image))
            .await
            .map_err(|e| e.context("error deleting previous images"))?;

        let resized = self
            .resize(&authorization.header, &new_name, &original_slot, &cropped_slot)
            .await
            .map_err(|e| e.context("error resizing"))?;

        let updated = Image {
            id: image.id,
            name: resized.name,
            format: resized.format,
            original: resized.original,
            domain: resized.domain,
            path: resized.path,
            sizes: resized.sizes,
            created_at: image.created_at,
            updated_at: image.updated_at,
            author_id: image.author_id,
        };

        self.images
            .update_one(updated)
            .await
            .map_err(|e| e.context("err saving image to database"))
    }

    async fn fetch_upload_slots(
        &self,
        authorization: &str,
        format: ImageFormat,
    ) -> Result<(SignedUploadSlot, SignedUploadSlot), AppError> {
        let original = {
            let resizer = self.resizer.clone();
            let authorization = authorization.to_string();
            async move {
                resizer
                    .fetch_signed_upload_slot(&authorization, format)
                    .await
            }
        };
        let cropped = {
            let resizer = self.resizer.clone();
            let authorization = authorization.to_string();
            async move {
                resizer
                    .fetch_signed_upload_slot(&authorization, format)
                    .await
            }
        };

        join_pair(original, cropped).await
    }

    async fn upload_both(
        &self,
        original_slot: &SignedUploadSlot,
        cropped_slot: &SignedUploadSlot,
        files: ImageFiles,
    ) -> Result<(), AppError> {
        let format = files.format;

        let original = {
            let resizer = self.resizer.clone();
            let slot = original_slot.clone();
            async move {
                tracing::info!(file_name = %slot.file_name, "Uploading original file");
                resizer
                    .upload_file(&slot.signed_url, format, files.original)
                    .await
            }
        };
        let cropped = {
            let resizer = self.resizer.clone();
            let slot = cropped_slot.clone();
            async move {
                tracing::info!(file_name = %slot.file_name, "Uploading cropped file");
                resizer
                    .upload_file(&slot.signed_url, format, files.cropped)
                    .await
            }
        };

        join_pair(original, cropped).await.map(|_| ())
    }

    async fn resize(
        &self,
        authorization: &str,
        name: &str,
        original_slot: &SignedUploadSlot,
        cropped_slot: &SignedUploadSlot,
    ) -> Result<ResizeResult, AppError> {
        let request = ResizeRequest {
            name: name.to_string(),
            file_path: cropped_slot.file_name.clone(),
            original_file_path: original_slot.file_name.clone(),
        };
        self.resizer.resize(authorization, request).await
    }
}
