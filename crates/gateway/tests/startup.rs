use classifier::ClassifierConfig;
use common::{Environment, LogLevel};
use gateway::{
    config::{GallerySettings, ServerSettings, Settings},
    startup::load_state,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn settings_with_model(model_path: PathBuf) -> Settings {
    Settings {
        log_level: LogLevel::Info,
        environment: Environment::Development,
        otel_endpoint: None,
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 1024,
        },
        classifier: ClassifierConfig {
            model_path,
            ..ClassifierConfig::default()
        },
        gallery: GallerySettings {
            images_dir: PathBuf::from("images"),
            thumbnail_size: 180,
        },
    }
}

#[test]
fn test_missing_model_halts_startup_naming_the_path() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("model").join("model_buah.onnx");

    let err = match load_state(&settings_with_model(model_path.clone())) {
        Ok(_) => panic!("startup must fail without a model"),
        Err(err) => err,
    };

    let expected = format!("Failed to load model at: {}", model_path.display());
    assert_eq!(err.to_string(), expected);

    let full = format!("{:#}", err);
    assert!(full.contains("model file not found"), "{full}");
    assert!(full.contains(&model_path.display().to_string()), "{full}");
    assert!(err.downcast_ref::<classifier::LoadError>().is_some());
}

