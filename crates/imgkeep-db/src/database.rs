use anyhow::{Context, Result};
use imgkeep_core::DatabaseConfig;
use imgkeep_infra::Retry;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// PostgreSQL connection pool shared by the SQL repositories.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect with retries, e.g. while the database container is starting.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::connect_with_retry(config, Retry::new(config.connect_retries)).await
    }

    pub async fn connect_with_retry(config: &DatabaseConfig, retry: Retry) -> Result<Self> {
        tracing::info!("Connecting to database...");

        let pool = retry
            .execute(|retry_count| async move {
                if retry_count > 0 {
                    tracing::info!(retry_count, "Retrying database connection...");
                }

                PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.timeout_seconds))
                    .idle_timeout(Duration::from_secs(600))
                    .max_lifetime(Duration::from_secs(1800))
                    .connect(&config.url)
                    .await
            })
            .await
            .context("Failed to connect to database")?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database connected successfully"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        tracing::info!("Closing database connection");
        self.pool.close().await;
    }
}
