//! Configuration for the stimulus generator and the result verifier.
//!
//! This module defines every path, dimension and numeric constant the two
//! tools use. It provides:
//! 1. **Defaults:** The values of the reference bench setup (877x658 frames, clip 1.2).
//! 2. **Structures:** Path, image shape and numeric policy sections.
//! 3. **Loading:** JSON deserialization with per-field defaults and validation.
//!
//! Any field missing from a JSON file falls back to its default, so a config
//! that only relocates the result file is a valid config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::HexByteOrder;
use crate::common::ConfigError;

/// Largest frame, in pixels, that can be held as one `f32` array.
pub const MAX_PIXELS: usize = isize::MAX.unsigned_abs() / std::mem::size_of::<f32>();

/// Returns `rows * cols` if a frame of that shape fits in memory.
pub const fn frame_len(shape: (usize, usize)) -> Option<usize> {
    match shape.0.checked_mul(shape.1) {
        Some(n) if n <= MAX_PIXELS => Some(n),
        _ => None,
    }
}

/// Default configuration constants.
///
/// These values reproduce the bench the hex vectors were first generated for.
mod defaults {
    /// Divisor operand image.
    pub const ILLUMINATION_IMAGE: &str = "image1.png";

    /// Dividend operand image.
    pub const OBSERVED_IMAGE: &str = "image2.png";

    /// Divisor stimulus records.
    pub const ILLUMINATION_HEX: &str = "img1_hex.txt";

    /// Dividend stimulus records.
    pub const OBSERVED_HEX: &str = "img2_hex.txt";

    /// Quotient records dumped by the HDL simulation.
    pub const RESULT_HEX: &str = "result_hex.txt";

    /// Visualization of the hardware quotient.
    pub const RESULT_PNG: &str = "verilog_result_pure.png";

    /// Visualization of the golden quotient.
    pub const REFERENCE_PNG: &str = "python_ref_pure.png";

    /// Frame height in pixels.
    pub const HEIGHT: usize = 877;

    /// Frame width in pixels.
    pub const WIDTH: usize = 658;

    /// Upper bound for metrics and visualization.
    ///
    /// Quotients above this are display saturation, not signal.
    pub const CLIP_MAX: f32 = 1.2;

    /// Divisor floor applied when computing the golden quotient.
    pub const ILLUMINATION_FLOOR: f32 = 0.05;

    /// Offset added to every normalized dividend pixel before encoding.
    pub const DIVIDEND_BIAS: f32 = 0.001;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use imgdiv_core::config::Config;
/// use imgdiv_core::HexByteOrder;
///
/// let json = r#"{
///     "paths": { "result_hex": "sim/out/quotient.hex" },
///     "image": { "height": 64, "width": 48 },
///     "numeric": { "byte_order": "LsbFirst" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.image.shape(), (64, 48));
/// assert_eq!(config.paths.result_hex.to_str(), Some("sim/out/quotient.hex"));
/// assert_eq!(config.paths.observed_hex.to_str(), Some("img2_hex.txt"));
/// assert_eq!(config.numeric.byte_order, HexByteOrder::LsbFirst);
/// assert_eq!(config.numeric.clip_max, 1.2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Input and output file locations
    #[serde(default)]
    pub paths: PathConfig,
    /// Verification frame shape
    #[serde(default)]
    pub image: ImageConfig,
    /// Clipping, flooring, bias and record byte order
    #[serde(default)]
    pub numeric: NumericConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that the values can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image.height == 0 || self.image.width == 0 {
            return Err(ConfigError::Invalid(format!(
                "image shape {}x{} has no pixels",
                self.image.height, self.image.width
            )));
        }
        if self.image.pixels().is_none() {
            return Err(ConfigError::Invalid(format!(
                "image shape {}x{} is too large",
                self.image.height, self.image.width
            )));
        }
        let numeric = &self.numeric;
        if !(numeric.clip_max.is_finite() && numeric.clip_max > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "clip_max must be positive and finite, got {}",
                numeric.clip_max
            )));
        }
        if !(numeric.illumination_floor.is_finite() && numeric.illumination_floor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "illumination_floor must be positive and finite, got {}",
                numeric.illumination_floor
            )));
        }
        if !numeric.dividend_bias.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "dividend_bias must be finite, got {}",
                numeric.dividend_bias
            )));
        }
        Ok(())
    }
}

/// File locations for both tools.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    /// Divisor PNG read by the generator
    #[serde(default = "PathConfig::default_illumination_image")]
    pub illumination_image: PathBuf,

    /// Dividend PNG read by the generator
    #[serde(default = "PathConfig::default_observed_image")]
    pub observed_image: PathBuf,

    /// Divisor records: written by the generator, read by the verifier
    #[serde(default = "PathConfig::default_illumination_hex")]
    pub illumination_hex: PathBuf,

    /// Dividend records: written by the generator, read by the verifier
    #[serde(default = "PathConfig::default_observed_hex")]
    pub observed_hex: PathBuf,

    /// Quotient records produced by the HDL simulation
    #[serde(default = "PathConfig::default_result_hex")]
    pub result_hex: PathBuf,

    /// Hardware quotient visualization
    #[serde(default = "PathConfig::default_result_png")]
    pub result_png: PathBuf,

    /// Golden quotient visualization
    #[serde(default = "PathConfig::default_reference_png")]
    pub reference_png: PathBuf,
}

impl PathConfig {
    fn default_illumination_image() -> PathBuf {
        PathBuf::from(defaults::ILLUMINATION_IMAGE)
    }

    fn default_observed_image() -> PathBuf {
        PathBuf::from(defaults::OBSERVED_IMAGE)
    }

    fn default_illumination_hex() -> PathBuf {
        PathBuf::from(defaults::ILLUMINATION_HEX)
    }

    fn default_observed_hex() -> PathBuf {
        PathBuf::from(defaults::OBSERVED_HEX)
    }

    fn default_result_hex() -> PathBuf {
        PathBuf::from(defaults::RESULT_HEX)
    }

    fn default_result_png() -> PathBuf {
        PathBuf::from(defaults::RESULT_PNG)
    }

    fn default_reference_png() -> PathBuf {
        PathBuf::from(defaults::REFERENCE_PNG)
    }

    /// Re-roots every path under `dir`.
    ///
    /// Absolute paths are left untouched, matching [`Path::join`].
    #[must_use]
    pub fn under(&self, dir: &Path) -> Self {
        Self {
            illumination_image: dir.join(&self.illumination_image),
            observed_image: dir.join(&self.observed_image),
            illumination_hex: dir.join(&self.illumination_hex),
            observed_hex: dir.join(&self.observed_hex),
            result_hex: dir.join(&self.result_hex),
            result_png: dir.join(&self.result_png),
            reference_png: dir.join(&self.reference_png),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            illumination_image: Self::default_illumination_image(),
            observed_image: Self::default_observed_image(),
            illumination_hex: Self::default_illumination_hex(),
            observed_hex: Self::default_observed_hex(),
            result_hex: Self::default_result_hex(),
            result_png: Self::default_result_png(),
            reference_png: Self::default_reference_png(),
        }
    }
}

/// Shape of the frames exchanged with the testbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Rows
    #[serde(default = "ImageConfig::default_height")]
    pub height: usize,

    /// Columns
    #[serde(default = "ImageConfig::default_width")]
    pub width: usize,
}

impl ImageConfig {
    fn default_height() -> usize {
        defaults::HEIGHT
    }

    fn default_width() -> usize {
        defaults::WIDTH
    }

    /// Returns `(height, width)`, the ndarray shape of a frame.
    pub const fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Returns the number of records a complete hex file holds.
    ///
    /// `None` if the frame would exceed [`MAX_PIXELS`].
    pub const fn pixels(&self) -> Option<usize> {
        frame_len(self.shape())
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            height: defaults::HEIGHT,
            width: defaults::WIDTH,
        }
    }
}

/// Numeric policy.
///
/// The dividend bias (generation time) and the illumination floor
/// (verification time) are independent zero-division guards. Existing
/// hardware vectors were produced with both in place.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericConfig {
    /// Upper clip bound and PSNR/SSIM data range
    #[serde(default = "NumericConfig::default_clip_max")]
    pub clip_max: f32,

    /// Smallest divisor used for the golden quotient
    #[serde(default = "NumericConfig::default_illumination_floor")]
    pub illumination_floor: f32,

    /// Offset added to the normalized dividend
    #[serde(default = "NumericConfig::default_dividend_bias")]
    pub dividend_bias: f32,

    /// Byte order of every hex record, read and written
    #[serde(default)]
    pub byte_order: HexByteOrder,
}

impl NumericConfig {
    fn default_clip_max() -> f32 {
        defaults::CLIP_MAX
    }

    fn default_illumination_floor() -> f32 {
        defaults::ILLUMINATION_FLOOR
    }

    fn default_dividend_bias() -> f32 {
        defaults::DIVIDEND_BIAS
    }
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            clip_max: defaults::CLIP_MAX,
            illumination_floor: defaults::ILLUMINATION_FLOOR,
            dividend_bias: defaults::DIVIDEND_BIAS,
            byte_order: HexByteOrder::default(),
        }
    }
}
