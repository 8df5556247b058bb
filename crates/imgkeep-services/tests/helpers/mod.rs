#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use imgkeep_auth::Authenticator;
use imgkeep_core::models::{
    AuthRole, AuthorizationContext, DeleteRequest, Dimensions, Image, ImageFormat, NewImage,
    Order, RenameRequest, ResizeRequest, ResizeResult, SignedUploadSlot, SizeMap, User,
};
use imgkeep_core::{AppError, ResizeError};
use imgkeep_db::{ImageRepository, InMemoryImageRepository};
use imgkeep_resize::Resizer;
use imgkeep_services::{ImageFiles, ImagesService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub const AUTH_HEADER: &str = "Bearer test-token";

#[derive(Debug, Clone, PartialEq)]
pub enum ResizerCall {
    Signed(ImageFormat),
    Upload {
        signed_url: String,
        format: ImageFormat,
        size: usize,
    },
    Resize(ResizeRequest),
    Rename(RenameRequest),
    Delete(DeleteRequest),
    Invalidate(DeleteRequest),
}

fn remote_failure(path: &str) -> AppError {
    AppError::Resize(ResizeError::bad_request(
        format!("https://resize.test{}", path),
        Some(500),
        "Bad request",
        "boom",
        None,
    ))
}

/// Resize service double that records every call in order.
#[derive(Default)]
pub struct RecordingResizer {
    pub calls: Mutex<Vec<ResizerCall>>,
    pub signed_counter: AtomicUsize,
    pub fail_signed_call: Option<usize>,
    pub slow_signed_call: Option<usize>,
    pub fail_upload: bool,
    pub fail_rename: bool,
    pub fail_delete: bool,
    pub fail_invalidate: bool,
    pub sizes: SizeMap,
}

impl RecordingResizer {
    pub fn new() -> Self {
        Self {
            sizes: sample_sizes(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ResizerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: fn(&ResizerCall) -> bool) -> usize {
        self.calls().iter().filter(|call| matcher(call)).count()
    }

    fn record(&self, call: ResizerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Resizer for RecordingResizer {
    async fn fetch_signed_upload_slot(
        &self,
        _authorization: &str,
        format: ImageFormat,
    ) -> Result<SignedUploadSlot, AppError> {
        let index = self.signed_counter.fetch_add(1, Ordering::SeqCst);
        self.record(ResizerCall::Signed(format));

        if self.slow_signed_call == Some(index) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if self.fail_signed_call == Some(index) {
            return Err(remote_failure("/signed"));
        }

        Ok(SignedUploadSlot {
            signed_url: format!("https://uploads.test/{}?sig=secret", index),
            file_name: format!("upload-{}.{}", index, format),
        })
    }

    async fn upload_file(
        &self,
        signed_url: &str,
        format: ImageFormat,
        content: Bytes,
    ) -> Result<(), AppError> {
        self.record(ResizerCall::Upload {
            signed_url: signed_url.to_string(),
            format,
            size: content.len(),
        });
        if self.fail_upload {
            return Err(remote_failure("/upload"));
        }
        Ok(())
    }

    async fn resize(
        &self,
        _authorization: &str,
        request: ResizeRequest,
    ) -> Result<ResizeResult, AppError> {
        self.record(ResizerCall::Resize(request.clone()));
        Ok(ResizeResult {
            format: ImageFormat::Jpg,
            original: format!("{}.jpg", request.name),
            name: request.name.clone(),
            domain: "cdn.test".to_string(),
            path: format!("images/{}", request.name),
            sizes: self.sizes.clone(),
        })
    }

    async fn rename(
        &self,
        _authorization: &str,
        request: RenameRequest,
    ) -> Result<ResizeResult, AppError> {
        self.record(ResizerCall::Rename(request.clone()));
        if self.fail_rename {
            return Err(remote_failure("/rename"));
        }
        Ok(ResizeResult {
            format: request.format,
            original: format!("{}.{}", request.new_name, request.format),
            name: request.new_name.clone(),
            domain: "cdn.test".to_string(),
            path: format!("images/{}", request.new_name),
            sizes: request.size_map,
        })
    }

    async fn delete(&self, _authorization: &str, request: DeleteRequest) -> Result<(), AppError> {
        self.record(ResizerCall::Delete(request));
        if self.fail_delete {
            return Err(remote_failure("/delete"));
        }
        Ok(())
    }

    async fn invalidate(
        &self,
        _authorization: &str,
        request: DeleteRequest,
    ) -> Result<(), AppError> {
        self.record(ResizerCall::Invalidate(request));
        if self.fail_invalidate {
            return Err(remote_failure("/invalidate"));
        }
        Ok(())
    }
}

/// Authenticator double returning a fixed user, or failing.
pub struct StaticAuthenticator {
    pub user: Option<User>,
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn get_or_sync_user(
        &self,
        authorization: &AuthorizationContext,
    ) -> Result<User, AppError> {
        self.user.clone().ok_or_else(|| {
            AppError::IdentityProvider(format!("unknown user {}", authorization.username))
        })
    }
}

/// Image repository whose every call fails.
pub struct BrokenImageRepository;

fn broken() -> AppError {
    AppError::Internal("connection reset".to_string())
}

#[async_trait]
impl ImageRepository for BrokenImageRepository {
    async fn get(&self, _limit: i64, _offset: i64, _order: Order) -> Result<Vec<Image>, AppError> {
        Err(broken())
    }

    async fn get_one(&self, _image_id: Uuid) -> Result<Image, AppError> {
        Err(broken())
    }

    async fn get_one_by_name(&self, _name: &str) -> Result<Image, AppError> {
        Err(broken())
    }

    async fn does_image_exist(&self, _name: &str) -> Result<bool, AppError> {
        Err(broken())
    }

    async fn create(&self, _image: NewImage) -> Result<Image, AppError> {
        Err(broken())
    }

    async fn set_name_by_id(&self, _image_id: Uuid, _new_name: &str) -> Result<Image, AppError> {
        Err(broken())
    }

    async fn update_one(&self, _image: Image) -> Result<Image, AppError> {
        Err(broken())
    }

    async fn delete_one(&self, _image_id: Uuid) -> Result<(), AppError> {
        Err(broken())
    }
}

pub fn sample_sizes() -> SizeMap {
    SizeMap {
        original: Dimensions::new(2000, 1000),
        s: Some(Dimensions::new(640, 320)),
        m: Some(Dimensions::new(1024, 512)),
        ..Default::default()
    }
}

pub fn test_user(role: AuthRole) -> User {
    User {
        id: Uuid::new_v4(),
        email: "ana@example.com".to_string(),
        role,
        username: "ana".to_string(),
        subject: "sub-ana".to_string(),
        display_name: "Ana".to_string(),
        disabled: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn authorization(role: AuthRole) -> AuthorizationContext {
    AuthorizationContext::new(AUTH_HEADER, "ana", role)
}

pub fn sample_files() -> ImageFiles {
    ImageFiles {
        format: ImageFormat::Jpg,
        original: Bytes::from_static(b"original-bytes"),
        cropped: Bytes::from_static(b"crop"),
    }
}

pub fn stored_image(name: &str, author_id: Uuid) -> Image {
    Image {
        id: Uuid::new_v4(),
        name: name.to_string(),
        format: ImageFormat::Png,
        original: format!("{}.png", name),
        domain: "cdn.test".to_string(),
        path: format!("images/{}", name),
        sizes: sample_sizes(),
        created_at: Some(Utc::now()),
        updated_at: None,
        author_id,
    }
}

/// Service wired to an in-memory repository and the given doubles.
pub struct TestContext {
    pub service: ImagesService,
    pub images: InMemoryImageRepository,
    pub resizer: Arc<RecordingResizer>,
    pub user: User,
}

pub fn setup(resizer: RecordingResizer, role: AuthRole) -> TestContext {
    imgkeep_infra::init_test_telemetry();

    let images = InMemoryImageRepository::new();
    let resizer = Arc::new(resizer);
    let user = test_user(role);
    let authenticator = StaticAuthenticator {
        user: Some(user.clone()),
    };

    let service = ImagesService::new(
        Arc::new(images.clone()),
        resizer.clone(),
        Arc::new(authenticator),
    );

    TestContext {
        service,
        images,
        resizer,
        user,
    }
}
