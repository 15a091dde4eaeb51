//! Result verification.
//!
//! Checks a hardware quotient dump against a floating-point golden reference:
//! 1. **Load:** Illumination, observed and result hex files (missing files read as zeros).
//! 2. **Reference:** `observed / max(illumination, floor)`.
//! 3. **Clip:** Both quotients to `[0, clip_max]`.
//! 4. **Compare:** PSNR and SSIM over the data range `clip_max`.
//! 5. **Export:** Both clipped quotients as grayscale PNGs.

/// Grayscale PNG export.
pub mod export;
/// Golden quotient and clipping.
pub mod golden;
/// PSNR and SSIM.
pub mod metrics;

use ndarray::Array2;
use tracing::info;

use crate::common::{MetricError, VerifyError};
use crate::config::Config;
use crate::report::{InputStats, VerificationReport};
use crate::sim::loader;

/// Similarity between the clipped golden and hardware quotients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Peak signal-to-noise ratio in dB (`+inf` when identical).
    pub psnr_db: f64,
    /// Mean structural similarity.
    pub ssim: f64,
}

/// Clipped quotients and their similarity.
#[derive(Debug, Clone)]
pub struct ClippedComparison {
    /// Golden quotient clipped to `[0, clip_max]`.
    pub reference: Array2<f32>,
    /// Hardware quotient clipped to `[0, clip_max]`.
    pub hardware: Array2<f32>,
    /// Metrics over the clipped pair.
    pub metrics: Comparison,
}

/// Clips both quotients to `[0, clip_max]` and scores the clipped pair.
///
/// Differences confined to values outside the clip range do not affect the
/// scores.
///
/// # Errors
///
/// Returns a [`MetricError`] for mismatched shapes, frames smaller than the
/// SSIM window, or a non-positive `clip_max`.
pub fn compare(
    reference: &Array2<f32>,
    hardware: &Array2<f32>,
    clip_max: f32,
) -> Result<ClippedComparison, MetricError> {
    let reference = golden::clip(reference, clip_max);
    let hardware = golden::clip(hardware, clip_max);
    let data_range = f64::from(clip_max);
    let scores = Comparison {
        psnr_db: metrics::psnr(&reference, &hardware, data_range)?,
        ssim: metrics::ssim(&reference, &hardware, data_range)?,
    };
    Ok(ClippedComparison {
        reference,
        hardware,
        metrics: scores,
    })
}

/// Runs a full verification pass with `config`.
///
/// Missing hex files are not fatal: they load as zero frames and show up as
/// degraded scores and in [`VerificationReport::inputs`].
///
/// # Errors
///
/// Returns [`VerifyError`] for an invalid config, unreadable (but present)
/// hex files, metric failures, or PNG write failures.
pub fn run_verification(config: &Config) -> Result<VerificationReport, VerifyError> {
    config.validate()?;
    let paths = &config.paths;
    let numeric = &config.numeric;
    let shape = config.image.shape();

    info!("loading hex files");
    let illumination = loader::load_hex_image(&paths.illumination_hex, shape, numeric.byte_order)?;
    let observed = loader::load_hex_image(&paths.observed_hex, shape, numeric.byte_order)?;
    let hardware = loader::load_hex_image(&paths.result_hex, shape, numeric.byte_order)?;

    info!("calculating golden reference");
    let reference = golden::golden_reference(
        &illumination.data,
        &observed.data,
        numeric.illumination_floor,
    )?;

    let clipped = compare(&reference, &hardware.data, numeric.clip_max)?;

    info!(clip_max = numeric.clip_max, "saving images");
    export::save_grayscale_png(&paths.result_png, &clipped.hardware, numeric.clip_max)?;
    export::save_grayscale_png(&paths.reference_png, &clipped.reference, numeric.clip_max)?;

    Ok(VerificationReport {
        psnr_db: clipped.metrics.psnr_db,
        ssim: clipped.metrics.ssim,
        shape,
        clip_max: numeric.clip_max,
        inputs: InputStats {
            illumination: illumination.stats,
            observed: observed.stats,
            hardware: hardware.stats,
        },
        missing: [&illumination, &observed, &hardware]
            .iter()
            .filter(|img| img.origin == loader::LoadOrigin::Missing)
            .count(),
        result_png: paths.result_png.clone(),
        reference_png: paths.reference_png.clone(),
    })
}
