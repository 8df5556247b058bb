//! Wire types exchanged with the external resize service.

use serde::{Deserialize, Serialize};

use crate::models::{Dimensions, ImageFormat, SizeMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlRequest {
    pub format: ImageFormat,
}

/// Single-use upload destination issued per upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadSlot {
    pub signed_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequest {
    pub name: String,
    /// Uploaded cropped file.
    pub file_path: String,
    pub original_file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResult {
    pub format: ImageFormat,
    pub original: String,
    pub name: String,
    pub domain: String,
    pub path: String,
    pub sizes: SizeMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub name: String,
    pub new_name: String,
    pub format: ImageFormat,
    pub size_map: SizeMap,
}

/// Body of both the delete and the invalidate calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub name: String,
    pub format: ImageFormat,
    pub dimensions: Vec<Dimensions>,
}
