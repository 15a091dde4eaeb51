//! Stimulus generation.
//!
//! Turns the divisor (illumination) and dividend (observed) PNGs into the two
//! hex record files the HDL testbench reads. Pixels are normalized to `[0, 1]`
//! in single precision and the dividend is offset by a small bias so the
//! divider never sees an exact zero numerator from a black pixel.

use std::borrow::Cow;
use std::path::Path;

use image::GrayImage;
use image::imageops::{self, FilterType};
use tracing::{debug, info, warn};

use crate::common::StimulusError;
use crate::config::Config;
use crate::report::StimulusSummary;
use crate::sim::loader;

/// Normalized operand planes ready for encoding, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusPair {
    /// Rows, taken from the illumination image.
    pub height: usize,
    /// Columns, taken from the illumination image.
    pub width: usize,
    /// Divisor operands, `pixel / 255`.
    pub illumination: Vec<f32>,
    /// Dividend operands, `pixel / 255 + bias`.
    pub observed: Vec<f32>,
    /// Whether the observed image was resampled to the illumination size.
    pub resized: bool,
}

/// Maps an 8-bit level to `[0, 1]`.
#[inline]
pub fn normalize_level(level: u8) -> f32 {
    f32::from(level) / 255.0
}

/// Reads an image and converts it to 8-bit luma.
///
/// Colour inputs are reduced with the Rec. 709 weights used by `image`
/// (0.2126, 0.7152, 0.0722), not the BT.601 weights (0.299, 0.587, 0.114)
/// of OpenCV's grayscale loader, so levels can differ by a few steps.
/// Grayscale inputs pass through unchanged.
///
/// # Errors
///
/// Returns [`StimulusError::ImageRead`] if the file is missing or not a
/// decodable image.
pub fn load_gray_image(path: &Path) -> Result<GrayImage, StimulusError> {
    let image = image::open(path).map_err(|source| StimulusError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_luma8())
}

/// Normalizes an image pair into divider operands.
///
/// If the observed image has a different size it is resampled (bilinear) to
/// the illumination size; aspect ratio is not preserved.
///
/// # Arguments
///
/// * `illumination` - Divisor image; defines the frame size.
/// * `observed` - Dividend image.
/// * `bias` - Offset added to every normalized dividend pixel.
pub fn prepare_operands(illumination: &GrayImage, observed: &GrayImage, bias: f32) -> StimulusPair {
    let (width, height) = illumination.dimensions();

    let resized = observed.dimensions() != (width, height);
    let observed: Cow<'_, GrayImage> = if resized {
        debug!(
            from = ?observed.dimensions(),
            to = ?(width, height),
            "resizing observed image to illumination size"
        );
        Cow::Owned(imageops::resize(observed, width, height, FilterType::Triangle))
    } else {
        Cow::Borrowed(observed)
    };

    StimulusPair {
        height: height as usize,
        width: width as usize,
        illumination: illumination.as_raw().iter().copied().map(normalize_level).collect(),
        observed: observed
            .as_raw()
            .iter()
            .map(|&level| normalize_level(level) + bias)
            .collect(),
        resized,
    }
}

/// Generates both stimulus files from the configured image pair.
///
/// Both images are read before anything is written, so a missing image leaves
/// previous stimulus files untouched. Existing stimulus files are overwritten.
///
/// # Errors
///
/// Returns [`StimulusError::Config`] for an invalid config,
/// [`StimulusError::ImageRead`] if either image cannot be read, and
/// [`StimulusError::Write`] if a hex file cannot be written.
pub fn generate_stimulus(config: &Config) -> Result<StimulusSummary, StimulusError> {
    config.validate()?;
    let paths = &config.paths;
    let numeric = &config.numeric;

    let illumination = load_gray_image(&paths.illumination_image)?;
    let observed = load_gray_image(&paths.observed_image)?;

    let pair = prepare_operands(&illumination, &observed, numeric.dividend_bias);
    info!(
        height = pair.height,
        width = pair.width,
        pixels = pair.illumination.len(),
        "processing images"
    );
    if (pair.height, pair.width) != config.image.shape() {
        warn!(
            stimulus = ?(pair.height, pair.width),
            configured = ?config.image.shape(),
            "stimulus size differs from the configured verification shape"
        );
    }

    let write = |path: &Path, values: &[f32]| {
        loader::write_hex_records(path, values.iter().copied(), numeric.byte_order).map_err(
            |source| StimulusError::Write {
                path: path.to_path_buf(),
                source,
            },
        )
    };
    let lines = write(&paths.illumination_hex, &pair.illumination)?;
    let observed_lines = write(&paths.observed_hex, &pair.observed)?;
    debug_assert_eq!(lines, observed_lines);

    Ok(StimulusSummary {
        height: pair.height,
        width: pair.width,
        lines,
        resized: pair.resized,
        illumination_hex: paths.illumination_hex.clone(),
        observed_hex: paths.observed_hex.clone(),
    })
}
