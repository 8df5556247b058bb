use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use imgkeep_core::error::BoxError;
use imgkeep_core::models::{
    DeleteRequest, ImageFormat, RenameRequest, ResizeRequest, ResizeResult, SignedUploadSlot,
    SignedUrlRequest,
};
use imgkeep_core::{AppError, ResizeConfig, ResizeError};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::traits::Resizer;

/// HTTP client for the external resize service.
#[derive(Clone, Debug)]
pub struct ResizeApi {
    client: Client,
    domain: String,
}

fn boxed(err: impl std::error::Error + Send + Sync + 'static) -> Option<BoxError> {
    Some(Box::new(err))
}

fn status_error(url: String, status: StatusCode, message: &str, body: String) -> ResizeError {
    if status == StatusCode::FORBIDDEN {
        ResizeError::forbidden(url, Some(status.as_u16()), "Forbidden request", body, None)
    } else {
        ResizeError::bad_request(url, Some(status.as_u16()), message, body, None)
    }
}

impl ResizeApi {
    pub fn new(domain: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create resize HTTP client")?;

        Ok(Self {
            client,
            domain: domain.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ResizeConfig) -> Result<Self> {
        Self::new(
            &config.api_domain,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.domain, path)
    }

    /// POST a JSON body and return the raw response text of a 2xx reply.
    async fn post<B: Serialize>(
        &self,
        authorization: &str,
        path: &str,
        request: &B,
        failure: &str,
    ) -> Result<(String, String), ResizeError> {
        let url = self.url(path);
        let payload = serde_json::to_string(request).map_err(|e| {
            ResizeError::bad_request(&url, None, "failed encoding request", "", boxed(e))
        })?;

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload.clone())
            .send()
            .await
            .map_err(|e| {
                ResizeError::bad_request(
                    &url,
                    e.status().map(|s| s.as_u16()),
                    failure,
                    payload,
                    boxed(e),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ResizeError::bad_request(
                &url,
                Some(status.as_u16()),
                "failed reading response",
                "",
                boxed(e),
            )
        })?;

        if !status.is_success() {
            return Err(status_error(url, status, failure, body));
        }

        Ok((url, body))
    }

    fn parse<T: DeserializeOwned>(url: String, body: String) -> Result<T, ResizeError> {
        serde_json::from_str(&body).map_err(|e| {
            ResizeError::bad_request(url, None, "failed unmarshalling response", body, boxed(e))
        })
    }
}

#[async_trait]
impl Resizer for ResizeApi {
    async fn fetch_signed_upload_slot(
        &self,
        authorization: &str,
        format: ImageFormat,
    ) -> Result<SignedUploadSlot, AppError> {
        let request = SignedUrlRequest { format };
        let (url, body) = self
            .post(authorization, "/signed", &request, "failed making signed url request")
            .await?;

        Ok(Self::parse(url, body)?)
    }

    async fn upload_file(
        &self,
        signed_url: &str,
        format: ImageFormat,
        data: Bytes,
    ) -> Result<(), AppError> {
        let content_type = format.content_type();
        let failure = format!("failed upload of file type {}", content_type);

        let response = self
            .client
            .put(signed_url)
            .header(header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| {
                ResizeError::bad_request(
                    signed_url,
                    e.status().map(|s| s.as_u16()),
                    &failure,
                    "",
                    boxed(e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                content_type = content_type,
                "Signed upload rejected"
            );
            return Err(status_error(signed_url.to_string(), status, &failure, body).into());
        }

        Ok(())
    }

    async fn resize(
        &self,
        authorization: &str,
        request: ResizeRequest,
    ) -> Result<ResizeResult, AppError> {
        tracing::info!(name = %request.name, "Issuing resize request");
        let (url, body) = self
            .post(authorization, "/resize", &request, "Failed resize request")
            .await?;

        Ok(Self::parse(url, body)?)
    }

    async fn rename(
        &self,
        authorization: &str,
        request: RenameRequest,
    ) -> Result<ResizeResult, AppError> {
        tracing::info!(name = %request.name, new_name = %request.new_name, "Issuing rename request");
        let (url, body) = self
            .post(authorization, "/rename", &request, "Failed rename request")
            .await?;

        Ok(Self::parse(url, body)?)
    }

    async fn delete(&self, authorization: &str, request: DeleteRequest) -> Result<(), AppError> {
        self.post(authorization, "/delete", &request, "failed deleting")
            .await?;
        Ok(())
    }

    async fn invalidate(
        &self,
        authorization: &str,
        request: DeleteRequest,
    ) -> Result<(), AppError> {
        self.post(authorization, "/invalidate", &request, "failed invalidating")
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgkeep_core::models::{Dimensions, SizeMap};
    use mockito::Matcher;
    use serde_json::json;

    const AUTH: &str = "Bearer token-123";

    fn api(server: &mockito::ServerGuard) -> ResizeApi {
        ResizeApi::new(&format!("{}/", server.url()), Duration::from_secs(5)).unwrap()
    }

    fn delete_request() -> DeleteRequest {
        DeleteRequest {
            name: "plane".to_string(),
            format: ImageFormat::Jpg,
            dimensions: vec![Dimensions::new(800, 600), Dimensions::new(320, 240)],
        }
    }

    #[tokio::test]
    async fn test_fetch_signed_upload_slot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/signed")
            .match_header("authorization", AUTH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "format": "webp" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"signedUrl":"https://bucket/upload/f1?sig=x","fileName":"f1.webp"}"#)
            .create_async()
            .await;

        let slot = api(&server)
            .fetch_signed_upload_slot(AUTH, ImageFormat::Webp)
            .await
            .unwrap();

        assert_eq!(slot.signed_url, "https://bucket/upload/f1?sig=x");
        assert_eq!(slot.file_name, "f1.webp");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_file_sets_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/upload/f1")
            .match_header("content-type", "image/png")
            .match_body("png-bytes")
            .with_status(200)
            .create_async()
            .await;

        let signed_url = format!("{}/upload/f1", server.url());
        api(&server)
            .upload_file(&signed_url, ImageFormat::Png, Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_forbidden() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/upload/f2")
            .with_status(403)
            .with_body("expired signature")
            .create_async()
            .await;

        let signed_url = format!("{}/upload/f2", server.url());
        let err = api(&server)
            .upload_file(&signed_url, ImageFormat::Jpg, Bytes::from_static(b"jpg"))
            .await
            .unwrap_err();

        let remote = err.as_resize_error().unwrap();
        assert!(remote.is_forbidden());
        assert_eq!(remote.status_code(), Some(403));
        assert_eq!(remote.body(), "expired signature");
    }

    #[tokio::test]
    async fn test_resize_parses_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/resize")
            .match_body(Matcher::Json(json!({
                "name": "plane",
                "filePath": "cropped.jpg",
                "originalFilePath": "original.jpg"
            })))
            .with_status(200)
            .with_body(
                json!({
                    "format": "jpg",
                    "original": "original.jpg",
                    "name": "plane",
                    "domain": "https://cdn.example.com",
                    "path": "images/plane",
                    "sizes": {
                        "original": { "width": 800, "height": 600 },
                        "s": { "width": 320, "height": 240 }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = api(&server)
            .resize(
                AUTH,
                ResizeRequest {
                    name: "plane".to_string(),
                    file_path: "cropped.jpg".to_string(),
                    original_file_path: "original.jpg".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.path, "images/plane");
        assert_eq!(
            result.sizes,
            SizeMap {
                s: Some(Dimensions::new(320, 240)),
                ..SizeMap::new(Dimensions::new(800, 600))
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resize_forbidden_and_bad_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/resize")
            .match_header("authorization", "Bearer expired")
            .with_status(403)
            .with_body("denied")
            .create_async()
            .await;
        server
            .mock("POST", "/resize")
            .match_header("authorization", AUTH)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let request = ResizeRequest {
            name: "plane".to_string(),
            file_path: "b".to_string(),
            original_file_path: "a".to_string(),
        };
        let client = api(&server);

        let forbidden = client.resize("Bearer expired", request.clone()).await.unwrap_err();
        assert!(forbidden.as_resize_error().unwrap().is_forbidden());

        let failed = client.resize(AUTH, request).await.unwrap_err();
        let remote = failed.as_resize_error().unwrap();
        assert!(!remote.is_forbidden());
        assert_eq!(remote.status_code(), Some(500));
        assert!(remote.url().ends_with("/resize"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_bad_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/signed")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = api(&server)
            .fetch_signed_upload_slot(AUTH, ImageFormat::Jpg)
            .await
            .unwrap_err();

        let remote = err.as_resize_error().unwrap();
        assert!(remote.to_string().contains("failed unmarshalling response"));
        assert_eq!(remote.body(), "not json");
    }

    #[tokio::test]
    async fn test_rename_posts_size_map() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rename")
            .match_body(Matcher::PartialJson(json!({
                "name": "plane",
                "newName": "jet",
                "format": "png",
                "sizeMap": { "original": { "width": 10, "height": 5 } }
            })))
            .with_status(200)
            .with_body(
                json!({
                    "format": "png",
                    "original": "jet.png",
                    "name": "jet",
                    "domain": "https://cdn.example.com",
                    "path": "images/jet",
                    "sizes": { "original": { "width": 10, "height": 5 } }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = api(&server)
            .rename(
                AUTH,
                RenameRequest {
                    name: "plane".to_string(),
                    new_name: "jet".to_string(),
                    format: ImageFormat::Png,
                    size_map: SizeMap::new(Dimensions::new(10, 5)),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.name, "jet");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_and_invalidate() {
        let mut server = mockito::Server::new_async().await;
        let delete = server
            .mock("POST", "/delete")
            .match_body(Matcher::Json(json!({
                "name": "plane",
                "format": "jpg",
                "dimensions": [
                    { "width": 800, "height": 600 },
                    { "width": 320, "height": 240 }
                ]
            })))
            .with_status(204)
            .create_async()
            .await;
        server
            .mock("POST", "/invalidate")
            .with_status(502)
            .with_body("cdn down")
            .create_async()
            .await;

        let client = api(&server);
        client.delete(AUTH, delete_request()).await.unwrap();
        delete.assert_async().await;

        let err = client.invalidate(AUTH, delete_request()).await.unwrap_err();
        assert_eq!(err.as_resize_error().unwrap().status_code(), Some(502));
    }

    #[test]
    fn test_from_config_trims_domain() {
        let config = ResizeConfig {
            api_domain: "https://images.example.com/".to_string(),
            timeout_seconds: 30,
        };
        let client = ResizeApi::from_config(&config).unwrap();
        assert_eq!(client.domain(), "https://images.example.com");
    }
}
