//! imgkeep Database Library
//!
//! This crate provides the repository capability traits consumed by the image
//! workflows, in-memory implementations of them, and the PostgreSQL
//! connection bootstrap.

pub mod database;
pub mod memory;
pub mod repository;

// Re-export commonly used types
pub use database::Database;
pub use memory::{InMemoryImageRepository, InMemoryUserRepository};
pub use repository::{ImageRepository, UserRepository};
