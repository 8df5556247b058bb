//! Configuration module
//!
//! This module provides configuration structures for the image services,
//! including database, resize service and identity provider settings.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const CONNECT_RETRIES: u32 = 4;
const IMAGES_API_TIMEOUT_SECS: u64 = 30;
const POST_AUTH_INTERVAL_SECS: u64 = 600;

/// Database connection settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_seconds: u64,
    /// Attempts made by `Database::connect` after the first failure.
    pub connect_retries: u32,
}

/// External resize service settings
#[derive(Clone, Debug)]
pub struct ResizeConfig {
    /// Base URL of the images API, without trailing slash.
    pub api_domain: String,
    pub timeout_seconds: u64,
}

/// Identity provider settings
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub region: String,
    pub user_pool_id: String,
    // Post-authentication queue consumer
    pub post_auth_queue_url: Option<String>,
    pub post_auth_interval_secs: u64,
    pub post_auth_consumer_disabled: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub resize: ResizeConfig,
    pub identity: IdentityConfig,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, anyhow::Error> {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} must be set", key))
        };

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid number"))?
                .unwrap_or(MAX_CONNECTIONS),
            timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("DB_TIMEOUT_SECONDS must be a valid number"))?
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            connect_retries: lookup("DB_CONNECT_RETRIES")
                .map(|v| v.parse::<u32>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("DB_CONNECT_RETRIES must be a valid number"))?
                .unwrap_or(CONNECT_RETRIES),
        };

        let resize = ResizeConfig {
            api_domain: required("IMAGES_API_DOMAIN")?
                .trim_end_matches('/')
                .to_string(),
            timeout_seconds: lookup("IMAGES_API_TIMEOUT_SECONDS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("IMAGES_API_TIMEOUT_SECONDS must be a valid number"))?
                .unwrap_or(IMAGES_API_TIMEOUT_SECS),
        };

        let identity = IdentityConfig {
            region: required("AWS_REGION")?,
            user_pool_id: required("AWS_USER_POOL_ID")?,
            post_auth_queue_url: lookup("SQS_POST_AUTH_URL").filter(|v| !v.is_empty()),
            post_auth_interval_secs: lookup("SQS_POST_AUTH_INTERVAL_SEC")
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("SQS_POST_AUTH_INTERVAL_SEC must be a valid number"))?
                .unwrap_or(POST_AUTH_INTERVAL_SECS),
            post_auth_consumer_disabled: lookup("SQS_POST_AUTH_CONSUMER_DISABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };

        Ok(Config {
            database,
            resize,
            identity,
            environment,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database.url.is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL must not be empty"));
        }

        if self.resize.api_domain.is_empty() {
            return Err(anyhow::anyhow!("IMAGES_API_DOMAIN must not be empty"));
        }

        if self.identity.region.is_empty() || self.identity.user_pool_id.is_empty() {
            return Err(anyhow::anyhow!(
                "AWS_REGION and AWS_USER_POOL_ID must not be empty"
            ));
        }

        if self.identity.post_auth_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "SQS_POST_AUTH_INTERVAL_SEC must be greater than 0"
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
