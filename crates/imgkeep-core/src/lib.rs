//! imgkeep Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! SEO name normalization shared across all imgkeep components.

pub mod config;
pub mod error;
pub mod models;
pub mod seo;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, IdentityConfig, ResizeConfig};
pub use error::{AppError, ErrorMetadata, LogLevel, ResizeError};
pub use seo::format_for_seo;
