//! Tracing subscriber bootstrap.

use anyhow::Context;
use bookstore_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log filter '{}'", settings.level)),
    }
}

/// Install the global tracing subscriber.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(settings)?);

    match settings.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    }
    .context("failed to install tracing subscriber")?;

    tracing::info!(
        target: "bookstore-telemetry",
        format = ?settings.log_format,
        level = %settings.level,
        "telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            level: "bookstore=loud".to_string(),
        };
        assert!(env_filter(&settings).is_err());
    }

    #[test]
    fn accepts_directive_list() {
        let settings = TelemetrySettings {
            log_format: LogFormat::Json,
            level: "info,sqlx=warn".to_string(),
        };
        assert!(env_filter(&settings).is_ok());
    }
}
