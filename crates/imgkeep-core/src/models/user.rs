use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

use crate::error::AppError;

/// Role granted by the identity provider group membership.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthRole {
    #[serde(rename = "Administrators")]
    Administrator,
    #[default]
    #[serde(rename = "")]
    None,
}

impl AuthRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthRole::Administrator => "Administrators",
            AuthRole::None => "",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "Administrators" => Ok(AuthRole::Administrator),
            "" => Ok(AuthRole::None),
            _ => Err(AppError::InvalidArgument(format!(
                "Invalid auth role of {}",
                value
            ))),
        }
    }

    pub fn parse_or(value: &str, default: AuthRole) -> Self {
        Self::parse(value).unwrap_or(default)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthRole::Administrator)
    }
}

impl Display for AuthRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// User record synced from the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: AuthRole,
    pub username: String,
    /// Identity provider subject.
    pub subject: String,
    pub display_name: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub role: AuthRole,
    pub username: String,
    pub subject: String,
    pub display_name: String,
    pub disabled: bool,
}

/// Extended attributes fetched from the identity provider for a username.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAttributes {
    pub username: String,
    pub subject: String,
    pub display_name: String,
    pub email: String,
}
