use crate::config::{Environment, LogLevel};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

/// Build the filter used by every subscriber in the workspace.
///
/// `RUST_LOG` takes precedence; otherwise the configured level applies.
pub fn env_filter(log_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()))
}

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// Also adds an OpenTelemetry layer that exports traces if a global tracer provider
/// has been initialized (e.g. via common::telemetry::TelemetryGuard).
pub fn setup_logging(log_level: LogLevel, environment: Environment) {
    init_subscriber(tracing_opentelemetry::layer(), log_level, environment);
}

pub(crate) fn init_subscriber<L>(otel_layer: L, log_level: LogLevel, environment: Environment)
where
    L: Layer<Layered<EnvFilter, Registry>> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(otel_layer);

    match environment {
        Environment::Production => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_level(true))
                .init();
        }
        Environment::Development => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_filter_falls_back_to_configured_level() {
        unsafe { std::env::remove_var("RUST_LOG") };

        let filter = env_filter(LogLevel::Warn);
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    #[serial]
    fn test_env_filter_prefers_rust_log() {
        unsafe { std::env::set_var("RUST_LOG", "gateway=debug") };

        let filter = env_filter(LogLevel::Error);
        assert_eq!(filter.to_string(), "gateway=debug");

        unsafe { std::env::remove_var("RUST_LOG") };
    }
}
