use anyhow::Context;

use crate::{config::Settings, state::AppState};

/// Load the model and build the shared request state. A model that cannot be
/// loaded is fatal; the error names the configured path.
pub fn load_state(settings: &Settings) -> anyhow::Result<AppState> {
    let model_path = &settings.classifier.model_path;

    let classifier = classifier::load_classifier(&settings.classifier)
        .inspect_err(|e| {
            tracing::error!(path = %e.path().display(), error = %e, "Model could not be loaded")
        })
        .with_context(|| format!("Failed to load model at: {}", model_path.display()))?;
    tracing::info!("Model loaded successfully");

    Ok(AppState::new(
        classifier,
        settings.gallery.clone(),
        settings.server.max_upload_bytes,
    ))
}
