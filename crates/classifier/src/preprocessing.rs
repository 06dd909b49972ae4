use crate::config::{ClassifierConfig, DEFAULT_INPUT_SIZE, TensorLayout};
use common::{span, span_debug};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use image::DynamicImage;
use ndarray::{Array, IxDyn};

/// Turns arbitrary images into the batched `[0, 1]` float tensor the model expects.
pub struct PreProcessor {
    pub input_size: u32,
    pub layout: TensorLayout,
    resizer: Resizer,
}

impl PreProcessor {
    pub fn new(input_size: u32, layout: TensorLayout) -> Self {
        Self {
            input_size,
            layout,
            resizer: Resizer::new(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.input_size, config.layout)
    }

    /// Shape of the tensor produced by [`PreProcessor::preprocess`].
    pub fn input_shape(&self) -> [usize; 4] {
        let side = self.input_size as usize;
        match self.layout {
            TensorLayout::Nhwc => [1, side, side, 3],
            TensorLayout::Nchw => [1, 3, side, side],
        }
    }

    pub fn preprocess(&mut self, image: &DynamicImage) -> anyhow::Result<Array<f32, IxDyn>> {
        let rgb = image.to_rgb8();
        self.preprocess_from_u8_slice(rgb.as_raw(), rgb.width(), rgb.height())
    }

    /// Preprocess tightly packed RGB8 pixels in HWC order.
    pub fn preprocess_from_u8_slice(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> anyhow::Result<Array<f32, IxDyn>> {
        let _s = span!("preprocess");

        tracing::trace!(
            width,
            height,
            pixel_bytes = pixels.len(),
            "Preprocessing image dimensions"
        );

        if width == 0 || height == 0 {
            anyhow::bail!("Cannot preprocess an empty {}x{} image", width, height);
        }

        let expected_size = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected_size {
            anyhow::bail!(
                "Buffer size mismatch: expected {}, got {} bytes",
                expected_size,
                pixels.len()
            );
        }

        let resized = self.resize(pixels, width, height)?;
        self.normalize(resized.buffer())
    }

    /// Stretch to `input_size x input_size`; aspect ratio is not preserved.
    fn resize(&mut self, pixels: &[u8], width: u32, height: u32) -> anyhow::Result<Image<'static>> {
        let _s = span_debug!("resize");

        let src = ImageRef::new(width, height, pixels, PixelType::U8x3)?;
        let mut resized = Image::new(self.input_size, self.input_size, PixelType::U8x3);

        self.resizer.resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
        )?;

        Ok(resized)
    }

    fn normalize(&self, buf: &[u8]) -> anyhow::Result<Array<f32, IxDyn>> {
        let _s = span_debug!("normalize");

        let output = match self.layout {
            TensorLayout::Nhwc => buf.iter().map(|&v| v as f32 / 255.0).collect(),
            TensorLayout::Nchw => {
                let spatial = buf.len() / 3;
                let mut output = vec![0.0f32; buf.len()];
                for (i, px) in buf.chunks_exact(3).enumerate() {
                    output[i] = px[0] as f32 / 255.0;
                    output[i + spatial] = px[1] as f32 / 255.0;
                    output[i + 2 * spatial] = px[2] as f32 / 255.0;
                }
                output
            }
        };

        Ok(Array::from_shape_vec(IxDyn(&self.input_shape()), output)?)
    }
}

impl Default for PreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE, TensorLayout::Nhwc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    // Resampling runs in fixed point, allow one quantization step.
    const TOLERANCE: f32 = 1.5 / 255.0;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_any_source_size_produces_model_input_shape() {
        let mut preprocessor = PreProcessor::default();

        for (w, h) in [(1, 1), (224, 224), (800, 600), (37, 1024)] {
            let output = preprocessor.preprocess(&solid(w, h, [10, 20, 30])).unwrap();
            assert_eq!(output.shape(), &[1, 224, 224, 3], "source {}x{}", w, h);
        }
    }

    #[test]
    fn test_values_are_scaled_into_unit_interval() {
        let mut preprocessor = PreProcessor::default();

        let output = preprocessor.preprocess(&solid(50, 40, [255, 0, 128])).unwrap();

        assert!(output.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((output[[0, 112, 112, 0]] - 1.0).abs() < TOLERANCE);
        assert!(output[[0, 112, 112, 1]].abs() < TOLERANCE);
        assert!((output[[0, 112, 112, 2]] - 128.0 / 255.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_nchw_layout_splits_channels_into_planes() {
        let mut preprocessor = PreProcessor::new(32, TensorLayout::Nchw);

        let output = preprocessor.preprocess(&solid(64, 64, [255, 0, 0])).unwrap();

        assert_eq!(output.shape(), &[1, 3, 32, 32]);
        assert!((output[[0, 0, 5, 5]] - 1.0).abs() < TOLERANCE);
        assert!(output[[0, 1, 5, 5]].abs() < TOLERANCE);
        assert!(output[[0, 2, 5, 5]].abs() < TOLERANCE);
    }

    #[test]
    fn test_non_rgb_input_is_converted() {
        let gray = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(10, 10, image::Luma([51u8])));
        let mut preprocessor = PreProcessor::new(8, TensorLayout::Nhwc);

        let output = preprocessor.preprocess(&gray).unwrap();

        assert_eq!(output.shape(), &[1, 8, 8, 3]);
        assert!((output[[0, 4, 4, 0]] - 0.2).abs() < TOLERANCE);
        assert!((output[[0, 4, 4, 2]] - 0.2).abs() < TOLERANCE);
    }

    #[test]
    fn test_buffer_size_mismatch_detection() {
        let mut preprocessor = PreProcessor::default();

        let result = preprocessor.preprocess_from_u8_slice(&[0u8; 200], 10, 10);

        assert!(result.is_err(), "Size mismatch should return error");
        assert!(result.unwrap_err().to_string().contains("mismatch"));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let mut preprocessor = PreProcessor::default();

        assert!(preprocessor.preprocess_from_u8_slice(&[], 0, 10).is_err());
    }
}
