use async_trait::async_trait;
use bytes::Bytes;
use imgkeep_core::models::{
    DeleteRequest, ImageFormat, RenameRequest, ResizeRequest, ResizeResult, SignedUploadSlot,
};
use imgkeep_core::AppError;

/// Operations of the external resize service.
///
/// Every call except `upload_file` forwards the caller's raw `Authorization`
/// header. Remote failures surface as `AppError::Resize`.
#[async_trait]
pub trait Resizer: Send + Sync {
    /// Request one single-use upload destination for a file of `format`.
    async fn fetch_signed_upload_slot(
        &self,
        authorization: &str,
        format: ImageFormat,
    ) -> Result<SignedUploadSlot, AppError>;

    /// PUT the raw file bytes to a signed URL.
    async fn upload_file(
        &self,
        signed_url: &str,
        format: ImageFormat,
        data: Bytes,
    ) -> Result<(), AppError>;

    async fn resize(
        &self,
        authorization: &str,
        request: ResizeRequest,
    ) -> Result<ResizeResult, AppError>;

    async fn rename(
        &self,
        authorization: &str,
        request: RenameRequest,
    ) -> Result<ResizeResult, AppError>;

    /// Remove every stored size variant.
    async fn delete(&self, authorization: &str, request: DeleteRequest) -> Result<(), AppError>;

    /// Purge the CDN cache for every size variant.
    async fn invalidate(
        &self,
        authorization: &str,
        request: DeleteRequest,
    ) -> Result<(), AppError>;
}
