use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "model/model_buah.onnx";
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Memory order of the model input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, H, W, 3]`, the channels-last layout Keras models are trained with.
    Nhwc,
    /// `[1, 3, H, W]`
    Nchw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProvider {
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    /// Side length of the square model input.
    pub input_size: u32,
    pub layout: TensorLayout,
    pub intra_threads: usize,
    pub execution_provider: ExecutionProvider,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            input_size: DEFAULT_INPUT_SIZE,
            layout: TensorLayout::Nhwc,
            intra_threads: 4,
            execution_provider: ExecutionProvider::Cpu,
        }
    }
}
