use crate::models::AuthRole;

/// Per-request authorization derived from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    /// Raw `Authorization` header, forwarded to the resize service.
    pub header: String,
    pub username: String,
    pub role: AuthRole,
}

impl AuthorizationContext {
    pub fn new(header: impl Into<String>, username: impl Into<String>, role: AuthRole) -> Self {
        Self {
            header: header.into(),
            username: username.into(),
            role,
        }
    }
}
