use crate::error::LoadError;
use ndarray::{Array, ArrayD, IxDyn};
use std::path::Path;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded model able to run forward passes.
pub trait InferenceBackend: Send {
    fn load_model(path: &Path) -> Result<Self, LoadError>
    where
        Self: Sized;

    /// Run one forward pass over a batched input tensor and return the raw
    /// score tensor.
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<ArrayD<f32>>;
}
