//! imgkeep Authentication Library
//!
//! Resolves the caller of a request to a stored user, creating the user from
//! identity provider attributes on first sight.

pub mod authenticator;
pub mod identity;

pub use authenticator::{Authenticator, UserSyncAuthenticator};
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
