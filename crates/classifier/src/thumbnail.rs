use image::{RgbImage, imageops};
use std::path::Path;

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 180;

/// Centre-crop the image at `path` to a square on its shorter side and scale it
/// to `size x size`.
///
/// Returns `None` when the file cannot be opened or decoded; callers fall back
/// to showing the original file.
pub fn square(path: &Path, size: u32) -> Option<RgbImage> {
    let img = match image::open(path) {
        Ok(img) => img.to_rgb8(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Cannot square image");
            return None;
        }
    };

    square_image(&img, size)
}

pub fn square_image(img: &RgbImage, size: u32) -> Option<RgbImage> {
    let (w, h) = img.dimensions();
    let min_side = w.min(h);
    if min_side == 0 || size == 0 {
        return None;
    }

    let left = (w - min_side) / 2;
    let top = (h - min_side) / 2;

    let cropped = imageops::crop_imm(img, left, top, min_side, min_side).to_image();

    Some(imageops::resize(
        &cropped,
        size,
        size,
        imageops::FilterType::CatmullRom,
    ))
}
