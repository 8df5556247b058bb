use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Production environments log JSON lines.
    pub fn for_environment(environment: &str) -> Self {
        if environment == "production" {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Initialize tracing with an `EnvFilter` from `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"imgkeep=debug"`).
pub fn init_telemetry(
    default_filter: &str,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()?;

    tracing::info!(?format, "Tracing initialized");
    Ok(())
}

/// Install a subscriber writing through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_telemetry() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_telemetry_is_idempotent() {
        init_test_telemetry();
        init_test_telemetry();
        tracing::debug!("still logging");
    }

    #[test]
    fn test_log_format_for_environment() {
        assert_eq!(LogFormat::for_environment("production"), LogFormat::Json);
        assert_eq!(LogFormat::for_environment("development"), LogFormat::Pretty);
    }

    #[tokio::test]
    async fn test_second_init_reports_error() {
        init_test_telemetry();
        assert!(init_telemetry("imgkeep=debug", LogFormat::Pretty).is_err());
        shutdown_telemetry().await;
    }
}
