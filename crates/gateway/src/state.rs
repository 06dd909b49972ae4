use crate::config::GallerySettings;
use classifier::Classifier;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    /// One loaded model shared by every request. Inference runs on the
    /// blocking pool, so a std mutex is enough.
    pub classifier: Arc<Mutex<Classifier>>,
    pub gallery: Arc<GallerySettings>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(classifier: Classifier, gallery: GallerySettings, max_upload_bytes: usize) -> Self {
        Self {
            classifier: Arc::new(Mutex::new(classifier)),
            gallery: Arc::new(gallery),
            max_upload_bytes,
        }
    }
}
