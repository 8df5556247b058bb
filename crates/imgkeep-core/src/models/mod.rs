//! Data models for the application
//!
//! This module contains the data structures shared by the repositories, the
//! resize client and the image workflows, organized by domain.

mod auth;
mod dimensions;
mod image;
mod pagination;
mod resize;
mod user;

// Re-export all models for convenient imports
pub use auth::*;
pub use dimensions::*;
pub use image::*;
pub use pagination::*;
pub use resize::*;
pub use user::*;
