//! Error definitions.
//!
//! Each tool has its own error enum so callers can tell a fatal stimulus
//! problem (unreadable source image) from a verification problem (unwritable
//! PNG). Degraded inputs such as malformed hex records or missing result files
//! are *not* errors; the loader substitutes zeros and reports them through
//! [`LoadStats`](crate::sim::loader::LoadStats).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reason a single hex record could not be decoded.
///
/// The best-effort decoder maps every variant to `0.0`; the strict decoder
/// surfaces it so the loader can classify records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The record was empty or whitespace only.
    #[error("empty hex record")]
    Empty,

    /// The record contains `x` or `z` digits from an undefined simulation signal.
    #[error("hex record '{0}' holds a simulation-unknown state")]
    UnknownState(String),

    /// The record does not have exactly eight digits.
    #[error("hex record '{token}' has {len} digits, expected 8")]
    Length {
        /// The trimmed record text.
        token: String,
        /// Number of characters found.
        len: usize,
    },

    /// The record has eight characters but at least one is not a hex digit.
    #[error("hex record '{0}' contains a non-hex character")]
    InvalidDigit(String),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the tools cannot work with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Stimulus generation failures. Any of these aborts before output is written.
#[derive(Debug, Error)]
pub enum StimulusError {
    /// A source image is missing or cannot be decoded.
    #[error("cannot read image {path}: {source}")]
    ImageRead {
        /// Path of the image.
        path: PathBuf,
        /// Underlying decode or I/O error.
        #[source]
        source: image::ImageError,
    },

    /// A stimulus hex file could not be written.
    #[error("failed to write hex file {path}: {source}")]
    Write {
        /// Path of the hex file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Metric and elementwise-operation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// The two arrays do not have the same shape.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Shape of the first operand.
        left: (usize, usize),
        /// Shape of the second operand.
        right: (usize, usize),
    },

    /// The SSIM window does not fit inside the image.
    #[error("SSIM window of {window} exceeds image extent {rows}x{cols}")]
    WindowTooLarge {
        /// Window side length.
        window: usize,
        /// Image rows.
        rows: usize,
        /// Image columns.
        cols: usize,
    },

    /// The data range is zero, negative or not finite.
    #[error("data range must be positive and finite, got {0}")]
    InvalidDataRange(f64),
}

/// Verification failures.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A hex file exists but could not be read.
    #[error("failed to read hex file {path}: {source}")]
    Read {
        /// Path of the hex file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Decoded records could not be arranged into the requested shape.
    #[error("cannot shape records as {rows}x{cols}: {source}")]
    Shape {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Underlying ndarray error.
        #[source]
        source: ndarray::ShapeError,
    },

    /// The requested frame has more pixels than fit in memory.
    #[error("frame of {rows}x{cols} is too large")]
    FrameTooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// The array is too large to be stored as an image.
    #[error("array of {rows}x{cols} cannot be rasterized")]
    Raster {
        /// Array rows.
        rows: usize,
        /// Array columns.
        cols: usize,
    },

    /// A visualization PNG could not be written.
    #[error("failed to save image {path}: {source}")]
    ImageWrite {
        /// Path of the image.
        path: PathBuf,
        /// Underlying encode or I/O error.
        #[source]
        source: image::ImageError,
    },

    /// Metric computation failed.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
