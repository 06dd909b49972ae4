use classifier::{
    ClassifierConfig, Fruit,
    config::{DEFAULT_INPUT_SIZE, DEFAULT_MODEL_PATH},
    thumbnail::DEFAULT_THUMBNAIL_SIZE,
};
use common::{Environment, LogLevel};
use serde::Deserialize;
use std::path::PathBuf;

use crate::catalog;

pub const ENV_PREFIX: &str = "FRUIT";

const DEFAULT_MAX_UPLOAD_BYTES: i64 = 200 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GallerySettings {
    pub images_dir: PathBuf,
    pub thumbnail_size: u32,
}

impl GallerySettings {
    pub fn image_path(&self, fruit: Fruit) -> PathBuf {
        self.images_dir.join(catalog::info(fruit).image_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub otel_endpoint: Option<String>,
    pub server: ServerSettings,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    pub gallery: GallerySettings,
}

/// Load settings from `FRUIT_*` environment variables, e.g.
/// `FRUIT_SERVER__PORT=8080` or `FRUIT_CLASSIFIER__MODEL_PATH=/models/buah.onnx`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    build_configuration(environment_source())
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build_configuration(source: config::Environment) -> Result<Settings, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8501)?
        .set_default("server.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES)?
        .set_default("classifier.model_path", DEFAULT_MODEL_PATH)?
        .set_default("classifier.input_size", i64::from(DEFAULT_INPUT_SIZE))?
        .set_default("gallery.images_dir", "images")?
        .set_default("gallery.thumbnail_size", i64::from(DEFAULT_THUMBNAIL_SIZE))?
        .add_source(source)
        .build()?;

    let settings: Settings = config.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.gallery.thumbnail_size == 0 {
            return Err(config::ConfigError::Message(
                "gallery.thumbnail_size must be greater than zero".to_string(),
            ));
        }
        if self.classifier.input_size == 0 {
            return Err(config::ConfigError::Message(
                "classifier.input_size must be greater than zero".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(config::ConfigError::Message(
                "server.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier::{ExecutionProvider, TensorLayout};
    use serial_test::serial;
    use std::collections::HashMap;

    fn configuration_from(vars: &[(&str, &str)]) -> Result<Settings, config::ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        build_configuration(environment_source().source(Some(map)))
    }

    #[test]
    fn test_defaults() {
        let settings = configuration_from(&[]).unwrap();

        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.environment, Environment::Development);
        assert!(settings.otel_endpoint.is_none());
        assert_eq!(settings.server.address(), "0.0.0.0:8501");
        assert_eq!(settings.server.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(settings.classifier.model_path, PathBuf::from("model/model_buah.onnx"));
        assert_eq!(settings.classifier.input_size, 224);
        assert_eq!(settings.classifier.layout, TensorLayout::Nhwc);
        assert_eq!(settings.classifier.execution_provider, ExecutionProvider::Cpu);
        assert_eq!(settings.gallery.thumbnail_size, 180);
        assert_eq!(
            settings.gallery.image_path(Fruit::Pisang),
            PathBuf::from("images/pisang_segar_4.jpg")
        );
    }

    #[test]
    fn test_nested_overrides() {
        let settings = configuration_from(&[
            ("FRUIT_ENVIRONMENT", "production"),
            ("FRUIT_LOG_LEVEL", "debug"),
            ("FRUIT_SERVER__PORT", "9000"),
            ("FRUIT_CLASSIFIER__MODEL_PATH", "/srv/models/buah.onnx"),
            ("FRUIT_CLASSIFIER__LAYOUT", "nchw"),
            ("FRUIT_GALLERY__THUMBNAIL_SIZE", "96"),
            ("FRUIT_OTEL_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();

        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.classifier.model_path, PathBuf::from("/srv/models/buah.onnx"));
        assert_eq!(settings.classifier.layout, TensorLayout::Nchw);
        assert_eq!(settings.gallery.thumbnail_size, 96);
        assert_eq!(settings.otel_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        assert!(configuration_from(&[("FRUIT_ENVIRONMENT", "staging")]).is_err());
    }

    #[test]
    fn test_zero_thumbnail_size_is_rejected() {
        let err = configuration_from(&[("FRUIT_GALLERY__THUMBNAIL_SIZE", "0")]).unwrap_err();
        assert!(err.to_string().contains("thumbnail_size"));
    }

    #[test]
    #[serial]
    fn test_reads_process_environment() {
        unsafe { std::env::set_var("FRUIT_SERVER__PORT", "8123") };

        let settings = get_configuration().unwrap();

        unsafe { std::env::remove_var("FRUIT_SERVER__PORT") };
        assert_eq!(settings.server.port, 8123);
    }
}
