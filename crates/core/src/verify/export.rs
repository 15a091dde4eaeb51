//! Grayscale PNG export.
//!
//! Values are normalized to `[0, vmax]` and quantized onto a 256-entry gray
//! ramp: `level = min(floor(v / vmax * 256), 255)`. Out-of-range values
//! saturate at black or white and NaN renders black.

use std::path::Path;

use image::GrayImage;
use ndarray::Array2;
use tracing::info;

use crate::common::VerifyError;

/// Number of entries in the gray ramp.
const GRAY_LEVELS: f32 = 256.0;

/// Quantizes one value to an 8-bit gray level.
///
/// # Examples
///
/// ```
/// use imgdiv_core::verify::export::gray_level;
///
/// assert_eq!(gray_level(0.0, 1.2), 0);
/// assert_eq!(gray_level(1.2, 1.2), 255);
/// assert_eq!(gray_level(0.5, 1.0), 128);
/// assert_eq!(gray_level(f32::NAN, 1.2), 0);
/// ```
pub fn gray_level(value: f32, vmax: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let scaled = (value / vmax * GRAY_LEVELS).floor();
    scaled.clamp(0.0, GRAY_LEVELS - 1.0) as u8
}

/// Renders a frame as an 8-bit grayscale image.
///
/// # Errors
///
/// Returns [`VerifyError::Raster`] if a side does not fit in `u32`.
pub fn to_gray_image(values: &Array2<f32>, vmax: f32) -> Result<GrayImage, VerifyError> {
    let (rows, cols) = values.dim();
    let raster = || VerifyError::Raster { rows, cols };
    let width = u32::try_from(cols).map_err(|_| raster())?;
    let height = u32::try_from(rows).map_err(|_| raster())?;
    let pixels: Vec<u8> = values.iter().map(|&v| gray_level(v, vmax)).collect();
    GrayImage::from_raw(width, height, pixels).ok_or_else(raster)
}

/// Saves a frame as a grayscale PNG scaled to `[0, vmax]`.
///
/// # Errors
///
/// Returns [`VerifyError::ImageWrite`] if the file cannot be encoded or written.
pub fn save_grayscale_png(path: &Path, values: &Array2<f32>, vmax: f32) -> Result<(), VerifyError> {
    let image = to_gray_image(values, vmax)?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| VerifyError::ImageWrite {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "saved");
    Ok(())
}
