pub mod backend;
pub mod config;
pub mod error;
pub mod labels;
pub mod postprocessing;
pub mod preprocessing;
pub mod service;
pub mod thumbnail;

// Re-export commonly used types for convenience
pub use backend::InferenceBackend;
pub use config::{ClassifierConfig, ExecutionProvider, TensorLayout};
pub use error::LoadError;
pub use labels::{CLASS_NAMES, Fruit, NUM_CLASSES, Ripeness};
pub use postprocessing::Prediction;
pub use service::Classifier;

/// Load the configured ONNX model and wrap it in a [`Classifier`].
#[cfg(feature = "ort-backend")]
pub fn load_classifier(config: &ClassifierConfig) -> Result<Classifier, LoadError> {
    let backend = backend::ort::OrtBackend::load_model_with_provider(
        &config.model_path,
        config.execution_provider,
        config.intra_threads,
    )?;

    Ok(Classifier::new(backend, config))
}
