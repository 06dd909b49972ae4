use super::InferenceBackend;
use crate::config::ExecutionProvider;
use crate::error::{LoadError, check_model_file};
use ndarray::{Array, ArrayD, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::fmt::Display;
use std::path::Path;

const DEFAULT_INTRA_THREADS: usize = 4;

pub struct OrtBackend {
    session: Session,
}

fn incompatible(path: &Path, reason: impl Display) -> LoadError {
    LoadError::Incompatible {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

impl OrtBackend {
    /// Load model with specified execution provider
    pub fn load_model_with_provider(
        path: &Path,
        provider: ExecutionProvider,
        intra_threads: usize,
    ) -> Result<Self, LoadError> {
        check_model_file(path)?;

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        #[cfg_attr(not(feature = "cuda"), allow(unused_mut))]
        let mut builder = Session::builder()
            .map_err(|e| incompatible(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| incompatible(path, e))?
            .with_intra_threads(intra_threads.max(1))
            .map_err(|e| incompatible(path, e))?;

        match provider {
            #[cfg(feature = "cuda")]
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder
                    .with_execution_providers([
                        ort::execution_providers::CUDAExecutionProvider::default()
                            .with_device_id(0)
                            .build()
                            .error_on_failure(),
                    ])
                    .map_err(|e| incompatible(path, e))?;
            }
            #[cfg(not(feature = "cuda"))]
            ExecutionProvider::Cuda => {
                return Err(incompatible(
                    path,
                    "CUDA execution provider requested but the `cuda` feature is disabled",
                ));
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder
            .commit_from_file(path)
            .map_err(|e| incompatible(path, e))?;

        tracing::info!(path = %path.display(), "Model loaded");
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &Path) -> Result<Self, LoadError> {
        Self::load_model_with_provider(path, ExecutionProvider::Cpu, DEFAULT_INTRA_THREADS)
    }

    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<ArrayD<f32>> {
        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let scores = outputs[0].try_extract_array::<f32>()?;

        Ok(scores.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_reported_before_touching_onnx_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model").join("model_buah.onnx");

        let err = OrtBackend::load_model(&path).err().expect("load must fail");

        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
