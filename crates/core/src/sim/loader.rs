//! Hex record file loading and writing.
//!
//! This module moves frames between memory and the testbench. It performs:
//! 1. **Loading:** Reads a hex record file into a `(height, width)` array, row-major.
//! 2. **Degradation:** Missing files, short files, unknown states and malformed records become zeros.
//! 3. **Writing:** Emits one newline-terminated record per value, overwriting the target.
//!
//! The loader never fails on file *content*. Only I/O errors other than
//! "not found" are returned, so a verification run always reaches its metrics.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use tracing::{debug, warn};

use crate::codec::{self, HexByteOrder};
use crate::common::{CodecError, VerifyError};
use crate::config;

/// Where the values of a [`HexImage`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Decoded from the file.
    File,
    /// The file did not exist; the array is a zero placeholder.
    Missing,
}

/// Record accounting for one loaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read from the file, blank lines included.
    pub records: usize,
    /// Records holding `x`/`z` digits, decoded as `0.0`.
    pub unknown: usize,
    /// Empty or malformed records, decoded as `0.0`.
    pub malformed: usize,
    /// Trailing zeros appended because the file was short.
    pub padded: usize,
    /// Records past the end of the frame, ignored.
    pub truncated: usize,
}

impl LoadStats {
    /// Returns `true` if any pixel of the frame did not come from a valid record.
    pub const fn is_degraded(&self) -> bool {
        self.unknown > 0 || self.malformed > 0 || self.padded > 0
    }
}

/// A frame loaded from a hex record file.
#[derive(Debug, Clone)]
pub struct HexImage {
    /// Pixel values, shape `(height, width)`.
    pub data: Array2<f32>,
    /// Whether the values came from the file.
    pub origin: LoadOrigin,
    /// Record accounting.
    pub stats: LoadStats,
}

impl HexImage {
    /// Creates the zero placeholder used when a file is missing.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::FrameTooLarge`] if `shape` exceeds
    /// [`MAX_PIXELS`](crate::config::MAX_PIXELS).
    pub fn missing(shape: (usize, usize)) -> Result<Self, VerifyError> {
        let padded = checked_len(shape)?;
        Ok(Self {
            data: Array2::zeros(shape),
            origin: LoadOrigin::Missing,
            stats: LoadStats {
                padded,
                ..LoadStats::default()
            },
        })
    }
}

fn checked_len(shape: (usize, usize)) -> Result<usize, VerifyError> {
    config::frame_len(shape).ok_or(VerifyError::FrameTooLarge {
        rows: shape.0,
        cols: shape.1,
    })
}

/// Decodes hex record text, one record per line.
///
/// Lines with an `x` or `z` anywhere decode to `0.0`, as does every line the
/// strict decoder rejects.
///
/// # Returns
///
/// The decoded values in file order and the unknown/malformed counts.
pub fn decode_records(text: &str, order: HexByteOrder) -> (Vec<f32>, LoadStats) {
    let mut stats = LoadStats::default();
    let values = text
        .lines()
        .map(|line| {
            stats.records += 1;
            match codec::try_decode_f32(line, order) {
                Ok(v) => v,
                Err(CodecError::UnknownState(_)) => {
                    stats.unknown += 1;
                    0.0
                }
                Err(_) => {
                    stats.malformed += 1;
                    0.0
                }
            }
        })
        .collect();
    (values, stats)
}

/// Loads a hex record file as a frame of exactly `shape`.
///
/// A missing file yields a zero frame and a warning. A short file is padded
/// with zeros and logs one warning per file; the count of padded pixels is
/// kept in [`LoadStats::padded`]. A long file is truncated. Bytes that are
/// not UTF-8 only spoil the records they appear in.
///
/// # Arguments
///
/// * `path` - Hex record file.
/// * `shape` - `(height, width)` of the frame.
/// * `order` - Byte order of the records.
///
/// # Errors
///
/// Returns [`VerifyError::FrameTooLarge`] if `shape` cannot be allocated and
/// [`VerifyError::Read`] if the file exists but cannot be read.
pub fn load_hex_image(
    path: &Path,
    shape: (usize, usize),
    order: HexByteOrder,
) -> Result<HexImage, VerifyError> {
    let expected = checked_len(shape)?;
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "hex file not found, substituting zeros");
            return HexImage::missing(shape);
        }
        Err(source) => {
            return Err(VerifyError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let (mut values, mut stats) = decode_records(&text, order);

    if values.len() < expected {
        stats.padded = expected - values.len();
        warn!(
            path = %path.display(),
            found = values.len(),
            expected,
            "not enough records, padding with zeros"
        );
        values.resize(expected, 0.0);
    } else if values.len() > expected {
        stats.truncated = values.len() - expected;
        debug!(path = %path.display(), extra = stats.truncated, "ignoring trailing records");
        values.truncate(expected);
    }
    if stats.unknown > 0 || stats.malformed > 0 {
        debug!(
            path = %path.display(),
            unknown = stats.unknown,
            malformed = stats.malformed,
            "records decoded as zero"
        );
    }

    let data = Array2::from_shape_vec(shape, values).map_err(|source| VerifyError::Shape {
        rows: shape.0,
        cols: shape.1,
        source,
    })?;

    Ok(HexImage {
        data,
        origin: LoadOrigin::File,
        stats,
    })
}

/// Writes one hex record per value, each followed by `\n`.
///
/// Any existing file at `path` is replaced.
///
/// # Returns
///
/// The number of records written.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be created or written.
pub fn write_hex_records<I>(path: &Path, values: I, order: HexByteOrder) -> io::Result<usize>
where
    I: IntoIterator<Item = f32>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for value in values {
        writeln!(writer, "{}", codec::encode_f32(value, order))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
