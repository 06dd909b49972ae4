use anyhow::Context;
use common::TelemetryGuard;
use gateway::{
    config::get_configuration, logging::setup_logging, routes::run_server, startup::load_state,
};

const SERVICE_NAME: &str = "fruit-gateway";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration().context("Failed to load configuration")?;

    let telemetry = settings
        .otel_endpoint
        .as_ref()
        .map(|endpoint| {
            TelemetryGuard::init(
                SERVICE_NAME,
                endpoint,
                settings.log_level,
                settings.environment,
            )
        })
        .transpose()?;

    // The telemetry guard installs its own subscriber
    if telemetry.is_none() {
        setup_logging(&settings);
    }

    tracing::info!(settings = ?settings, "Loaded configuration");

    let state = load_state(&settings)?;

    run_server(&settings.server, state).await
}
