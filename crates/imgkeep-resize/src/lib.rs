//! imgkeep Resize Client Library
//!
//! This crate provides the `Resizer` capability consumed by the image
//! workflows and its HTTP implementation against the external resize service.

pub mod client;
pub mod traits;

pub use client::ResizeApi;
pub use traits::Resizer;
