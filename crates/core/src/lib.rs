//! Stimulus generation and golden-reference verification for a hardware image divider.
//!
//! This crate drives both ends of a Verilog divider testbench:
//! 1. **Codec:** Bit-exact conversion between `f32` pixels and 8-digit hex records.
//! 2. **Loader:** Hex record files to dense `(height, width)` arrays, tolerant of simulation artifacts.
//! 3. **Stimulus:** PNG operand pair to normalized, biased hex stimulus files.
//! 4. **Verify:** Golden quotient, clipping, PSNR/SSIM and grayscale PNG export.
//! 5. **Report:** Console summaries for both tools.

/// Error types shared across the crate.
pub mod common;
/// Tool configuration (paths, image shape, numeric policy).
pub mod config;
/// IEEE-754 single-precision to hex record codec.
pub mod codec;
/// Console reports for stimulus generation and verification runs.
pub mod report;
/// Hex record file loading and writing.
pub mod sim;
/// PNG operand pair to hex stimulus conversion.
pub mod stimulus;
/// Golden reference, comparison metrics and image export.
pub mod verify;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Hex record byte order shared by the encoder and decoder.
pub use crate::codec::HexByteOrder;
/// Outcome of a verification run.
pub use crate::report::VerificationReport;
