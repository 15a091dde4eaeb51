//! Full-reference image quality metrics.
//!
//! - [`psnr`]: peak signal-to-noise ratio over a fixed data range.
//! - [`ssim`]: mean structural similarity (Wang et al., 2004) with a 7x7
//!   uniform window and sample covariance, the usual scientific-Python
//!   formulation, so scores line up with earlier bench reports.
//!
//! Statistics are accumulated in `f64` regardless of the `f32` inputs.

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::common::MetricError;
use crate::verify::golden::check_shapes;

/// Side length of the SSIM window.
pub const SSIM_WINDOW: usize = 7;

/// SSIM luminance stabilizer coefficient.
const K1: f64 = 0.01;

/// SSIM contrast stabilizer coefficient.
const K2: f64 = 0.03;

fn check_data_range(data_range: f64) -> Result<(), MetricError> {
    if data_range.is_finite() && data_range > 0.0 {
        Ok(())
    } else {
        Err(MetricError::InvalidDataRange(data_range))
    }
}

/// Mean squared error between two equally shaped arrays.
///
/// # Errors
///
/// Returns [`MetricError::ShapeMismatch`] if the shapes differ.
pub fn mse(reference: &Array2<f32>, test: &Array2<f32>) -> Result<f64, MetricError> {
    check_shapes(reference, test)?;
    if reference.is_empty() {
        return Ok(0.0);
    }
    let sum = Zip::from(reference).and(test).fold(0.0_f64, |acc, &r, &t| {
        let d = f64::from(r) - f64::from(t);
        acc + d * d
    });
    Ok(sum / reference.len() as f64)
}

/// Peak signal-to-noise ratio in dB.
///
/// `10 * log10(data_range^2 / MSE)`. Identical inputs give `+inf`.
///
/// # Errors
///
/// Returns [`MetricError::ShapeMismatch`] if the shapes differ and
/// [`MetricError::InvalidDataRange`] if `data_range` is not positive.
pub fn psnr(reference: &Array2<f32>, test: &Array2<f32>, data_range: f64) -> Result<f64, MetricError> {
    check_data_range(data_range)?;
    let err = mse(reference, test)?;
    if err == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (data_range * data_range / err).log10())
}

/// Maps an out-of-range index back into `[0, len)` by mirror reflection
/// about the edge (`d c b a | a b c d | d c b a`).
fn reflect_index(index: isize, len: isize) -> usize {
    let period = 2 * len;
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - 1 - i;
    }
    i as usize
}

/// Centered moving average over one lane with reflected borders.
fn box_mean(src: ArrayView1<'_, f64>, mut dst: ArrayViewMut1<'_, f64>, size: usize) {
    let len = src.len() as isize;
    let half = (size / 2) as isize;
    for (i, out) in dst.iter_mut().enumerate() {
        let centre = i as isize;
        let sum: f64 = (centre - half..=centre + half)
            .map(|j| src[reflect_index(j, len)])
            .sum();
        *out = sum / size as f64;
    }
}

/// Separable `size x size` uniform filter.
fn uniform_filter(input: &Array2<f64>, size: usize) -> Array2<f64> {
    let mut rows = Array2::zeros(input.dim());
    Zip::from(input.lanes(Axis(1)))
        .and(rows.lanes_mut(Axis(1)))
        .for_each(|src, dst| box_mean(src, dst, size));

    let mut out = Array2::zeros(input.dim());
    Zip::from(rows.lanes(Axis(0)))
        .and(out.lanes_mut(Axis(0)))
        .for_each(|src, dst| box_mean(src, dst, size));
    out
}

/// Mean structural similarity index.
///
/// Local means, variances and covariance come from a
/// [`SSIM_WINDOW`]-square uniform window, variances use the sample (`N - 1`)
/// normalization, and the similarity map is averaged after cropping the
/// `(SSIM_WINDOW - 1) / 2` pixels whose windows cross the border.
///
/// Identical inputs score exactly `1.0`.
///
/// # Errors
///
/// Returns [`MetricError::ShapeMismatch`] if the shapes differ,
/// [`MetricError::WindowTooLarge`] if either side is shorter than the window,
/// and [`MetricError::InvalidDataRange`] if `data_range` is not positive.
pub fn ssim(reference: &Array2<f32>, test: &Array2<f32>, data_range: f64) -> Result<f64, MetricError> {
    check_shapes(reference, test)?;
    check_data_range(data_range)?;
    let (rows, cols) = reference.dim();
    if rows < SSIM_WINDOW || cols < SSIM_WINDOW {
        return Err(MetricError::WindowTooLarge {
            window: SSIM_WINDOW,
            rows,
            cols,
        });
    }

    let x = reference.mapv(f64::from);
    let y = test.mapv(f64::from);

    let ux = uniform_filter(&x, SSIM_WINDOW);
    let uy = uniform_filter(&y, SSIM_WINDOW);
    let uxx = uniform_filter(&(&x * &x), SSIM_WINDOW);
    let uyy = uniform_filter(&(&y * &y), SSIM_WINDOW);
    let uxy = uniform_filter(&(&x * &y), SSIM_WINDOW);

    let np = (SSIM_WINDOW * SSIM_WINDOW) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * data_range).powi(2);
    let c2 = (K2 * data_range).powi(2);

    let pad = (SSIM_WINDOW - 1) / 2;
    let mut sum = 0.0;
    let mut count = 0_usize;
    for r in pad..rows - pad {
        for c in pad..cols - pad {
            let mx = ux[[r, c]];
            let my = uy[[r, c]];
            let vx = cov_norm * (uxx[[r, c]] - mx * mx);
            let vy = cov_norm * (uyy[[r, c]] - my * my);
            let vxy = cov_norm * (uxy[[r, c]] - mx * my);

            let numerator = (2.0 * mx * my + c1) * (2.0 * vxy + c2);
            let denominator = (mx * mx + my * my + c1) * (vx + vy + c2);
            sum += numerator / denominator;
            count += 1;
        }
    }
    Ok(sum / count as f64)
}
